//! Rubric tables: the criteria, allowed marks and weights for each category.
//!
//! The table is immutable once built. It is constructed from the built-in
//! defaults (see [`defaults`]) and optionally adjusted by configuration, then
//! passed by reference to the aggregator.

mod defaults;

use crate::error::{ScoringError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use defaults::{NINE_CRITERION_WEIGHTS, SIX_CRITERION_CATEGORIES};

/// Tolerance used when matching a submitted mark against the allowed values.
const VALUE_TOLERANCE: f64 = 1e-9;

/// Weight applied to a criterion position that has no configured weight.
pub const FALLBACK_WEIGHT: f64 = 1.0;

/// Key under which criterion `position` (1-based) is stored in a score map.
pub fn criterion_key(position: usize) -> String {
    format!("C{}", position)
}

/// A single rubric criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Text shown to the evaluator
    pub label: String,
    /// Allowed marks, in ascending order
    pub values: Vec<f64>,
}

impl Criterion {
    pub fn new(label: &str, values: &[f64]) -> Self {
        Self {
            label: label.to_string(),
            values: values.to_vec(),
        }
    }

    /// Highest mark this criterion allows
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub fn allows(&self, value: f64) -> bool {
        self.values
            .iter()
            .any(|allowed| (allowed - value).abs() < VALUE_TOLERANCE)
    }
}

/// The rubric for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    /// Category name, e.g. "Ensino"
    pub category: String,
    /// Criteria in rubric order; criterion `i` is scored under key `C{i}`
    pub criteria: Vec<Criterion>,
    /// Weight per criterion position
    pub weights: Vec<f64>,
}

impl Rubric {
    pub fn new(category: &str, criteria: Vec<Criterion>, weights: Vec<f64>) -> Self {
        Self {
            category: category.to_string(),
            criteria,
            weights,
        }
    }

    /// Number of criteria (k)
    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    /// Weight for a 1-based criterion position.
    ///
    /// Positions beyond the configured weight vector get [`FALLBACK_WEIGHT`].
    pub fn weight(&self, position: usize) -> f64 {
        position
            .checked_sub(1)
            .and_then(|idx| self.weights.get(idx))
            .copied()
            .unwrap_or(FALLBACK_WEIGHT)
    }

    /// Sum of the best marks of every criterion
    pub fn max_raw_total(&self) -> f64 {
        self.criteria.iter().map(Criterion::max_value).sum()
    }

    /// Score keys this rubric expects, `C1..Ck`
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.criterion_count()).map(criterion_key)
    }

    /// Check that a submitted score map is complete and uses allowed marks.
    ///
    /// Aggregation never calls this; it is the gate applied when an
    /// evaluation is submitted.
    pub fn validate(&self, scores: &BTreeMap<String, f64>) -> Result<(), ValidationError> {
        for (idx, criterion) in self.criteria.iter().enumerate() {
            let key = criterion_key(idx + 1);
            let value = scores
                .get(&key)
                .copied()
                .ok_or_else(|| ValidationError::MissingCriterion(key.clone()))?;
            if !criterion.allows(value) {
                return Err(ValidationError::ValueNotAllowed { key, value });
            }
        }

        let k = self.criterion_count();
        if let Some(extra) = scores.keys().find(|key| !is_rubric_key(key, k)) {
            return Err(ValidationError::UnexpectedCriterion(extra.clone()));
        }

        Ok(())
    }
}

fn is_rubric_key(key: &str, k: usize) -> bool {
    key.strip_prefix('C')
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| (1..=k).contains(&n) && criterion_key(n) == key)
}

impl fmt::Display for Rubric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} criteria)", self.category, self.criterion_count())?;
        for (idx, criterion) in self.criteria.iter().enumerate() {
            let marks: Vec<String> = criterion.values.iter().map(|v| v.to_string()).collect();
            writeln!(
                f,
                "  {} [w={}] {} ({})",
                criterion_key(idx + 1),
                self.weight(idx + 1),
                criterion.label,
                marks.join(" / ")
            )?;
        }
        Ok(())
    }
}

/// Lookup of category -> rubric
#[derive(Debug, Clone, PartialEq)]
pub struct RubricTable {
    rubrics: Vec<Rubric>,
}

impl Default for RubricTable {
    fn default() -> Self {
        Self::new(defaults::default_rubrics())
    }
}

impl RubricTable {
    /// Build a table from rubrics. A later rubric replaces an earlier one
    /// with the same category.
    pub fn new(rubrics: Vec<Rubric>) -> Self {
        let mut table = Self {
            rubrics: Vec::with_capacity(rubrics.len()),
        };
        for rubric in rubrics {
            table = table.with_rubric(rubric);
        }
        table
    }

    /// Add or replace a category's rubric
    pub fn with_rubric(mut self, rubric: Rubric) -> Self {
        match self
            .rubrics
            .iter_mut()
            .find(|r| r.category == rubric.category)
        {
            Some(existing) => *existing = rubric,
            None => self.rubrics.push(rubric),
        }
        self
    }

    /// Replace the weight vector of an existing category
    pub fn with_weights(mut self, category: &str, weights: Vec<f64>) -> Result<Self, ScoringError> {
        let rubric = self
            .rubrics
            .iter_mut()
            .find(|r| r.category == category)
            .ok_or_else(|| ScoringError::UnknownCategory(category.to_string()))?;
        rubric.weights = weights;
        Ok(self)
    }

    pub fn get(&self, category: &str) -> Result<&Rubric, ScoringError> {
        self.rubrics
            .iter()
            .find(|r| r.category == category)
            .ok_or_else(|| ScoringError::UnknownCategory(category.to_string()))
    }

    /// Number of criteria scored in `category`
    pub fn criterion_count(&self, category: &str) -> Result<usize, ScoringError> {
        self.get(category).map(Rubric::criterion_count)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_ok()
    }

    /// Category names in table order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rubrics.iter().map(|r| r.category.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rubric> {
        self.rubrics.iter()
    }
}
