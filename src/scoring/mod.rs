// Scoring module - standardization and aggregation of rubric marks.
// Every report path scores projects through `Aggregator`; nothing else
// re-derives the final score.

mod aggregate;
mod standardize;

pub use aggregate::{compute_final_score, AggregationResult, Aggregator, CriterionScores};
pub use standardize::{mean, population_std_dev, standardize, DEFAULT_OFFSET};
