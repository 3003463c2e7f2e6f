use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A project entered in the fair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: String,
    /// Project title
    pub title: String,
    /// Category, which selects the rubric
    pub category: String,
    /// Student names as entered
    #[serde(default)]
    pub students: Option<String>,
    /// Advisor name
    #[serde(default)]
    pub advisor: Option<String>,
    /// Class or group the students belong to
    #[serde(default)]
    pub class_group: Option<String>,
    /// Academic term, e.g. "2025/1"
    #[serde(default)]
    pub term: Option<String>,
}

impl Project {
    pub fn new(id: &str, title: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            students: None,
            advisor: None,
            class_group: None,
            term: None,
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.category)
    }
}

/// One evaluator's marks for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Project being evaluated
    pub project_id: String,
    /// Evaluator identity as supplied by the identity provider
    pub evaluator_id: String,
    /// Evaluator e-mail, used as a display fallback
    #[serde(default)]
    pub evaluator_email: Option<String>,
    /// Raw marks keyed by criterion (`C1`..`Ck`)
    pub scores: BTreeMap<String, f64>,
    /// Free-text comment
    #[serde(default)]
    pub comment: Option<String>,
    /// When the evaluation was last submitted
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Evaluation {
    pub fn new(project_id: &str, evaluator_id: &str, scores: BTreeMap<String, f64>) -> Self {
        Self {
            project_id: project_id.to_string(),
            evaluator_id: evaluator_id.to_string(),
            evaluator_email: None,
            scores,
            comment: None,
            timestamp: None,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Plain sum of every raw mark, no standardization
    pub fn raw_total(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Name to show for the evaluator: e-mail when known, else the id
    pub fn evaluator_label(&self) -> &str {
        self.evaluator_email.as_deref().unwrap_or(&self.evaluator_id)
    }
}
