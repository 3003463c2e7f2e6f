//! Ordering and classification of scored projects.

use crate::store::Evaluation;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Final score at or above which a project is approved
pub const DEFAULT_APPROVAL_THRESHOLD: f64 = 5.0;

/// Length of the per-project evaluation display list
pub const DEFAULT_TOP_EVALUATIONS: usize = 3;

/// Label used for padding entries in the evaluation display list
pub const NO_EVALUATOR: &str = "Sem avaliador";

/// A project with its final score, as fed into ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProject {
    pub id: String,
    pub category: String,
    pub final_score: f64,
}

impl RankedProject {
    pub fn new(id: &str, category: &str, final_score: f64) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            final_score,
        }
    }
}

/// Something that can be ranked by final score
pub trait Scored {
    fn final_score(&self) -> f64;
}

impl Scored for RankedProject {
    fn final_score(&self) -> f64 {
        self.final_score
    }
}

/// Total descending order on scores. NaN goes after every number, including
/// negative infinity. `-0.0` and `0.0` compare equal.
fn descending(a: f64, b: f64) -> Ordering {
    a.is_nan().cmp(&b.is_nan()).then_with(|| {
        // neither side is NaN here, so the comparison always succeeds
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    })
}

/// Sort by final score, highest first. Equal scores keep input order.
pub fn rank_projects<T: Scored>(mut projects: Vec<T>) -> Vec<T> {
    // sort_by is stable
    projects.sort_by(|a, b| descending(a.final_score(), b.final_score()));
    projects
}

/// Approval outcome of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Approved,
    Rejected,
    /// No evaluations yet; counted as neither approved nor rejected
    NotEvaluated,
}

impl ApprovalStatus {
    /// Classify a final score. The threshold itself is approved.
    pub fn classify(final_score: f64, evaluation_count: usize, threshold: f64) -> Self {
        if evaluation_count == 0 {
            ApprovalStatus::NotEvaluated
        } else if final_score >= threshold {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
            ApprovalStatus::NotEvaluated => write!(f, "not evaluated"),
        }
    }
}

/// One row of the per-project evaluation display list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEvaluation {
    /// Evaluator id, `None` for a padding row
    pub evaluator_id: Option<String>,
    /// Display name of the evaluator
    pub evaluator: String,
    /// Plain sum of the raw marks
    pub raw_total: f64,
}

impl TopEvaluation {
    pub fn placeholder() -> Self {
        Self {
            evaluator_id: None,
            evaluator: NO_EVALUATOR.to_string(),
            raw_total: 0.0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.evaluator_id.is_none()
    }
}

/// Evaluations with the highest raw totals, padded with placeholders up to
/// `count` entries.
///
/// This list is for display only and never feeds the final score.
pub fn top_evaluations(evaluations: &[Evaluation], count: usize) -> Vec<TopEvaluation> {
    let mut rows: Vec<TopEvaluation> = evaluations
        .iter()
        .map(|e| TopEvaluation {
            evaluator_id: Some(e.evaluator_id.clone()),
            evaluator: e.evaluator_label().to_string(),
            raw_total: e.raw_total(),
        })
        .collect();

    rows.sort_by(|a, b| descending(a.raw_total, b.raw_total));
    rows.truncate(count);

    while rows.len() < count {
        rows.push(TopEvaluation::placeholder());
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn eval(evaluator: &str, marks: &[f64]) -> Evaluation {
        let scores: BTreeMap<String, f64> = marks
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("C{}", i + 1), *v))
            .collect();
        Evaluation::new("p1", evaluator, scores)
    }

    #[test]
    fn test_rank_descending() {
        let ranked = rank_projects(vec![
            RankedProject::new("a", "Ensino", 7.0),
            RankedProject::new("b", "Ensino", 9.5),
            RankedProject::new("c", "Ensino", 3.2),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rank_keeps_input_order_on_ties() {
        let ranked = rank_projects(vec![
            RankedProject::new("first", "IFTECH", 10.0),
            RankedProject::new("low", "IFTECH", 4.0),
            RankedProject::new("second", "IFTECH", 10.0),
            RankedProject::new("third", "IFTECH", 10.0),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third", "low"]);
    }

    #[test]
    fn test_rank_with_nan_scores() {
        let projects: Vec<RankedProject> = (0..200)
            .map(|i| {
                let score = if i % 7 == 0 { f64::NAN } else { (i % 50) as f64 };
                RankedProject::new(&format!("p{}", i), "Ensino", score)
            })
            .collect();
        let ranked = rank_projects(projects);

        let valid: Vec<&RankedProject> =
            ranked.iter().filter(|p| !p.final_score.is_nan()).collect();
        assert!(valid
            .windows(2)
            .all(|w| w[0].final_score >= w[1].final_score));

        // NaN scores all come after the valid ones
        let first_nan = ranked
            .iter()
            .position(|p| p.final_score.is_nan())
            .unwrap();
        assert_eq!(first_nan, valid.len());
        assert!(ranked[first_nan..].iter().all(|p| p.final_score.is_nan()));

        // ties keep input order: p1, p51, p101, p151 all score 1.0
        let ones: Vec<&str> = valid
            .iter()
            .filter(|p| p.final_score == 1.0)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ones, vec!["p1", "p51", "p101", "p151"]);
    }

    #[test]
    fn test_rank_orders_infinities_before_nan() {
        let ranked = rank_projects(vec![
            RankedProject::new("nan", "IFTECH", f64::NAN),
            RankedProject::new("neg", "IFTECH", f64::NEG_INFINITY),
            RankedProject::new("mid", "IFTECH", 3.0),
            RankedProject::new("pos", "IFTECH", f64::INFINITY),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pos", "mid", "neg", "nan"]);
    }

    #[test]
    fn test_rank_signed_zeros_tie() {
        let ranked = rank_projects(vec![
            RankedProject::new("neg-zero", "Ensino", -0.0),
            RankedProject::new("zero", "Ensino", 0.0),
        ]);
        assert_eq!(ranked[0].id, "neg-zero");
        assert_eq!(ranked[1].id, "zero");
    }

    #[test]
    fn test_approval_boundary_is_inclusive() {
        assert_eq!(
            ApprovalStatus::classify(5.0, 1, DEFAULT_APPROVAL_THRESHOLD),
            ApprovalStatus::Approved
        );
        assert_eq!(
            ApprovalStatus::classify(4.999, 2, DEFAULT_APPROVAL_THRESHOLD),
            ApprovalStatus::Rejected
        );
    }

    #[test]
    fn test_unevaluated_is_neither() {
        assert_eq!(
            ApprovalStatus::classify(0.0, 0, DEFAULT_APPROVAL_THRESHOLD),
            ApprovalStatus::NotEvaluated
        );
        assert_eq!(
            ApprovalStatus::classify(12.0, 0, DEFAULT_APPROVAL_THRESHOLD),
            ApprovalStatus::NotEvaluated
        );
    }

    #[test]
    fn test_top_evaluations_sorted_by_raw_total() {
        let evals = vec![
            eval("low", &[0.2, 0.2]),
            eval("high", &[1.8, 1.6]),
            eval("mid", &[1.0, 0.5]),
            eval("lowest", &[0.0, 0.0]),
        ];
        let top = top_evaluations(&evals, DEFAULT_TOP_EVALUATIONS);
        let names: Vec<&str> = top.iter().map(|t| t.evaluator.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        assert!((top[0].raw_total - 3.4).abs() < 1e-9);
    }

    #[test]
    fn test_top_evaluations_nan_total_goes_last() {
        let evals = vec![
            eval("broken", &[f64::NAN, 1.0]),
            eval("mid", &[1.0, 0.5]),
            eval("high", &[1.8, 1.6]),
            eval("low", &[0.2, 0.2]),
        ];
        let top = top_evaluations(&evals, 4);
        let names: Vec<&str> = top.iter().map(|t| t.evaluator.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low", "broken"]);
    }

    #[test]
    fn test_top_evaluations_padded_with_placeholders() {
        let evals = vec![eval("only", &[1.0])];
        let top = top_evaluations(&evals, DEFAULT_TOP_EVALUATIONS);
        assert_eq!(top.len(), 3);
        assert!(!top[0].is_placeholder());
        assert!(top[1].is_placeholder());
        assert_eq!(top[2].evaluator, NO_EVALUATOR);
        assert_eq!(top[2].raw_total, 0.0);

        let empty = top_evaluations(&[], DEFAULT_TOP_EVALUATIONS);
        assert!(empty.iter().all(TopEvaluation::is_placeholder));
    }
}
