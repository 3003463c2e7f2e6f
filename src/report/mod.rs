//! Ranked score reports built from a snapshot of the evaluation store.

mod builder;
mod listing;
mod results;

pub use builder::{ReportBuilder, ReportOptions};
pub use listing::{list_evaluations, EvaluationEntry, EvaluationFilter};
pub use results::{
    CategoryReport, EvaluatorStats, ProjectReport, ReportSummary, ScoreReport, UnsupportedProject,
};
