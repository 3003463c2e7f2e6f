use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FAIR-EVAL: rubric scoring for science fairs
///
/// Standardizes evaluator marks per criterion, aggregates them into a final
/// score per project and ranks projects within each category.
#[derive(Parser, Debug)]
#[command(name = "fair-eval")]
#[command(version = "0.1.0")]
#[command(about = "Score, rank and report science fair evaluations")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the ranked report for every project
    Report(ReportArgs),

    /// Show the score breakdown of a single project
    Score(ScoreArgs),

    /// Check every evaluation against its rubric
    Validate(ValidateArgs),

    /// List evaluations, newest first
    Evaluations(EvaluationsArgs),

    /// Print the rubric table
    Rubric(RubricArgs),

    /// Generate a sample scoring config file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Snapshot of projects and evaluations (YAML or JSON)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Scoring config file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to write the JSON and Markdown report into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only report this category
    #[arg(long)]
    pub category: Option<String>,

    /// Override the number of projects scored concurrently
    #[arg(long)]
    pub parallelism: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Snapshot of projects and evaluations (YAML or JSON)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Project ID to score
    #[arg(short, long)]
    pub project: String,

    /// Scoring config file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Snapshot of projects and evaluations (YAML or JSON)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Scoring config file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct EvaluationsArgs {
    /// Snapshot of projects and evaluations (YAML or JSON)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Only projects whose title contains this text
    #[arg(short, long)]
    pub project: Option<String>,

    /// Only evaluators whose id or e-mail contains this text
    #[arg(short, long)]
    pub evaluator: Option<String>,

    /// Only this category
    #[arg(long)]
    pub category: Option<String>,

    /// First day to include (YYYY-MM-DD, UTC)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD, UTC)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Parser, Debug)]
pub struct RubricArgs {
    /// Only print this category
    #[arg(long)]
    pub category: Option<String>,

    /// Scoring config file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the config file
    #[arg(short, long, default_value = "fair-config.yaml")]
    pub output: PathBuf,
}
