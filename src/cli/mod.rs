mod args;
mod config;

pub use args::{
    Args, Command, EvaluationsArgs, InitArgs, ReportArgs, RubricArgs, ScoreArgs, ValidateArgs,
};
pub use config::{ScoringConfig, ScoringSettings};
