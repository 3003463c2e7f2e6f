//! Access to projects and evaluations.
//!
//! The document store itself lives outside this crate. Reports read it
//! through [`EvaluationSource`], and [`Snapshot`] is a frozen in-memory copy
//! loaded from a YAML or JSON export.

mod records;

pub use records::{Evaluation, Project};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read access to the project and evaluation collections
pub trait EvaluationSource {
    /// All projects, in store order
    fn projects(&self) -> Vec<Project>;

    /// Every evaluation recorded for `project_id`
    fn evaluations_for(&self, project_id: &str) -> Vec<Evaluation>;

    /// Category of a project, if the project exists
    fn category_of(&self, project_id: &str) -> Option<String> {
        self.projects()
            .into_iter()
            .find(|p| p.id == project_id)
            .map(|p| p.category)
    }
}

/// A point-in-time copy of both collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
}

impl Snapshot {
    pub fn new(projects: Vec<Project>, evaluations: Vec<Evaluation>) -> Self {
        Self {
            projects,
            evaluations,
        }
    }

    /// Load a snapshot from a `.yaml`/`.yml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read snapshot file: {:?}", path))?;

        let snapshot = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).context("Failed to parse JSON snapshot")?
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).context("Failed to parse YAML snapshot")?
            }
            other => bail!("Unsupported snapshot format: {:?}", other),
        };

        Ok(snapshot)
    }

    /// Save the snapshot, choosing the format from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?
            }
            _ => serde_yaml::to_string(self).context("Failed to serialize snapshot")?,
        };
        std::fs::write(path, content)
            .context(format!("Failed to write snapshot file: {:?}", path))?;
        Ok(())
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Record an evaluation, replacing any earlier one by the same evaluator
    /// for the same project.
    pub fn upsert_evaluation(&mut self, evaluation: Evaluation) {
        match self.evaluations.iter_mut().find(|e| {
            e.project_id == evaluation.project_id && e.evaluator_id == evaluation.evaluator_id
        }) {
            Some(existing) => *existing = evaluation,
            None => self.evaluations.push(evaluation),
        }
    }

    /// Evaluations whose project id matches no known project
    pub fn orphan_evaluations(&self) -> Vec<&Evaluation> {
        self.evaluations
            .iter()
            .filter(|e| self.project(&e.project_id).is_none())
            .collect()
    }
}

impl EvaluationSource for Snapshot {
    fn projects(&self) -> Vec<Project> {
        self.projects.clone()
    }

    fn evaluations_for(&self, project_id: &str) -> Vec<Evaluation> {
        self.evaluations
            .iter()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect()
    }

    fn category_of(&self, project_id: &str) -> Option<String> {
        self.project(project_id).map(|p| p.category.clone())
    }
}
