use crate::ranking::{DEFAULT_APPROVAL_THRESHOLD, DEFAULT_TOP_EVALUATIONS};
use crate::report::ReportOptions;
use crate::rubric::{Criterion, Rubric, RubricTable};
use crate::scoring::DEFAULT_OFFSET;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for scoring and reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Name of the event, used as the report title
    pub name: String,

    /// Description of the event
    #[serde(default)]
    pub description: String,

    /// Global settings
    #[serde(default)]
    pub settings: ScoringSettings,

    /// Weight vectors replacing the built-in ones, by category
    #[serde(default)]
    pub weights: BTreeMap<String, Vec<f64>>,

    /// Extra rubrics, or replacements for built-in categories
    #[serde(default)]
    pub categories: Vec<Rubric>,
}

/// Global scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Offset added to every standardized mark
    #[serde(default = "default_offset")]
    pub offset: f64,

    /// Final score at or above which a project is approved
    #[serde(default = "default_approval_threshold")]
    pub approval_threshold: f64,

    /// Evaluations listed per project
    #[serde(default = "default_top_evaluations")]
    pub top_evaluations: usize,

    /// Winners listed per category
    #[serde(default = "default_winners")]
    pub winners: usize,

    /// Projects scored concurrently
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            offset: default_offset(),
            approval_threshold: default_approval_threshold(),
            top_evaluations: default_top_evaluations(),
            winners: default_winners(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_offset() -> f64 {
    DEFAULT_OFFSET
}

fn default_approval_threshold() -> f64 {
    DEFAULT_APPROVAL_THRESHOLD
}

fn default_top_evaluations() -> usize {
    DEFAULT_TOP_EVALUATIONS
}

fn default_winners() -> usize {
    3
}

fn default_parallelism() -> usize {
    4
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name: "Science Fair".to_string(),
            description: String::new(),
            settings: ScoringSettings::default(),
            weights: BTreeMap::new(),
            categories: Vec::new(),
        }
    }
}

impl ScoringConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context(format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ScoringConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .context(format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Build the rubric table: defaults, then extra categories, then weight
    /// overrides.
    pub fn rubric_table(&self) -> Result<RubricTable> {
        let mut table = RubricTable::default();
        for rubric in &self.categories {
            table = table.with_rubric(rubric.clone());
        }
        for (category, weights) in &self.weights {
            table = table
                .with_weights(category, weights.clone())
                .context(format!("Invalid weight override for {}", category))?;
        }
        Ok(table)
    }

    /// Report settings, optionally restricted to one category
    pub fn report_options(&self, category: Option<String>) -> ReportOptions {
        ReportOptions {
            name: self.name.clone(),
            offset: self.settings.offset,
            approval_threshold: self.settings.approval_threshold,
            top_evaluations: self.settings.top_evaluations,
            winners: self.settings.winners,
            parallelism: self.settings.parallelism,
            category,
        }
    }

    /// Generate a sample configuration
    pub fn sample() -> Self {
        Self {
            name: "Mostra de Trabalhos".to_string(),
            description: "Sample scoring configuration".to_string(),
            settings: ScoringSettings::default(),
            weights: [(
                "IFTECH".to_string(),
                vec![0.9, 0.8, 0.7, 0.6, 0.6, 0.4],
            )]
            .into_iter()
            .collect(),
            categories: vec![Rubric::new(
                "Artes",
                vec![
                    Criterion::new("Originalidade.", &[0.0, 1.0, 2.0, 3.0, 4.0]),
                    Criterion::new("Execução técnica.", &[0.0, 0.75, 1.5, 2.25, 3.0]),
                    Criterion::new("Apresentação.", &[0.0, 0.75, 1.5, 2.25, 3.0]),
                ],
                vec![1.0, 0.8, 0.6],
            )],
        }
    }
}
