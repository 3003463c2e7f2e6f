use super::standardize::{standardize, DEFAULT_OFFSET};
use crate::error::ScoringError;
use crate::rubric::{criterion_key, RubricTable};
use crate::store::Evaluation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Anything that exposes raw marks keyed by criterion
pub trait CriterionScores {
    /// Raw mark for `key` (`C1`..`Ck`), `None` when absent
    fn score(&self, key: &str) -> Option<f64>;
}

impl CriterionScores for BTreeMap<String, f64> {
    fn score(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

impl CriterionScores for HashMap<String, f64> {
    fn score(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

impl CriterionScores for Evaluation {
    fn score(&self, key: &str) -> Option<f64> {
        self.scores.score(key)
    }
}

impl<T: CriterionScores + ?Sized> CriterionScores for &T {
    fn score(&self, key: &str) -> Option<f64> {
        (**self).score(key)
    }
}

/// Outcome of aggregating one project's evaluations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Weighted, standardized total per evaluation, in input order
    pub per_evaluation_scores: Vec<f64>,
    /// Mean of `per_evaluation_scores`, 0 with no evaluations
    pub final_score: f64,
}

impl AggregationResult {
    pub fn empty() -> Self {
        Self {
            per_evaluation_scores: Vec::new(),
            final_score: 0.0,
        }
    }

    pub fn evaluation_count(&self) -> usize {
        self.per_evaluation_scores.len()
    }
}

/// Aggregates raw evaluations into a final project score
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    rubrics: &'a RubricTable,
    offset: f64,
}

impl<'a> Aggregator<'a> {
    pub fn new(rubrics: &'a RubricTable) -> Self {
        Self {
            rubrics,
            offset: DEFAULT_OFFSET,
        }
    }

    /// Use a different positive shift than the default 2.5
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn rubrics(&self) -> &'a RubricTable {
        self.rubrics
    }

    /// Score one project.
    ///
    /// Missing criterion keys count as 0. Fails only when `category` has no
    /// rubric, and does so even when there are no evaluations.
    pub fn aggregate<S: CriterionScores>(
        &self,
        category: &str,
        evaluations: &[S],
    ) -> Result<AggregationResult, ScoringError> {
        let rubric = self.rubrics.get(category)?;

        if evaluations.is_empty() {
            return Ok(AggregationResult::empty());
        }

        let mut per_evaluation_scores = vec![0.0; evaluations.len()];

        for position in 1..=rubric.criterion_count() {
            let key = criterion_key(position);
            let values: Vec<f64> = evaluations
                .iter()
                .map(|e| e.score(&key).unwrap_or(0.0))
                .collect();
            let weight = rubric.weight(position);

            for (total, standardized) in per_evaluation_scores
                .iter_mut()
                .zip(standardize(&values, self.offset))
            {
                *total += standardized * weight;
            }
        }

        let final_score =
            per_evaluation_scores.iter().sum::<f64>() / per_evaluation_scores.len() as f64;

        Ok(AggregationResult {
            per_evaluation_scores,
            final_score,
        })
    }
}

/// Score one project with the default offset
pub fn compute_final_score<S: CriterionScores>(
    rubrics: &RubricTable,
    category: &str,
    evaluations: &[S],
) -> Result<AggregationResult, ScoringError> {
    Aggregator::new(rubrics).aggregate(category, evaluations)
}
