//! Rubric scoring for science fair evaluations.
//!
//! Raw per-criterion marks from several evaluators are standardized per
//! criterion, weighted and averaged into one final score per project
//! ([`scoring`]). Projects are then ranked and classified within their
//! category ([`ranking`]) and assembled into reports ([`report`]).

pub mod cli;
pub mod error;
pub mod ranking;
pub mod report;
pub mod rubric;
pub mod scoring;
pub mod store;

pub use error::{ScoringError, ValidationError};
pub use ranking::{rank_projects, ApprovalStatus, RankedProject};
pub use rubric::{Criterion, Rubric, RubricTable};
pub use scoring::{compute_final_score, AggregationResult, Aggregator, CriterionScores};
pub use store::{Evaluation, EvaluationSource, Project, Snapshot};
