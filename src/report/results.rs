use crate::ranking::{rank_projects, ApprovalStatus, Scored, TopEvaluation};
use crate::store::{Evaluation, Project};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scored result of a single project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    /// Project identifier
    pub project_id: String,
    /// Project title
    pub title: String,
    /// Category the project was scored in
    pub category: String,
    /// Position within its category, 1-based; 0 until the report is finalized
    pub rank: u32,
    /// Final standardized score
    pub final_score: f64,
    /// Weighted standardized total of each evaluation
    pub per_evaluation_scores: Vec<f64>,
    /// Number of evaluations that were aggregated
    pub evaluation_count: usize,
    /// Approval outcome
    pub status: ApprovalStatus,
    /// Best evaluations by raw total, padded for display
    pub top_evaluations: Vec<TopEvaluation>,
}

impl Scored for ProjectReport {
    fn final_score(&self) -> f64 {
        self.final_score
    }
}

/// A project that could not be scored because its category has no rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedProject {
    pub project_id: String,
    pub title: String,
    pub category: String,
}

/// Ranked projects of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    /// Projects ordered by final score, highest first
    pub projects: Vec<ProjectReport>,
}

impl CategoryReport {
    /// Evaluated projects at the top of the ranking
    pub fn winners(&self, count: usize) -> Vec<&ProjectReport> {
        self.projects
            .iter()
            .filter(|p| p.evaluation_count > 0)
            .take(count)
            .collect()
    }
}

/// Per-evaluator activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorStats {
    /// Evaluator identifier
    pub evaluator_id: String,
    /// Display name (e-mail when known)
    pub evaluator: String,
    /// Evaluations submitted
    pub evaluation_count: usize,
    /// Average raw total across those evaluations
    pub average_raw_total: f64,
    /// Titles of the projects evaluated (project id when unknown)
    pub projects: Vec<String>,
}

impl EvaluatorStats {
    /// Build stats for every evaluator appearing in `evaluations`, sorted by id
    pub fn collect(evaluations: &[Evaluation], projects: &[Project]) -> Vec<EvaluatorStats> {
        let mut by_evaluator: BTreeMap<&str, Vec<&Evaluation>> = BTreeMap::new();
        for evaluation in evaluations {
            by_evaluator
                .entry(evaluation.evaluator_id.as_str())
                .or_default()
                .push(evaluation);
        }

        by_evaluator
            .into_iter()
            .map(|(evaluator_id, theirs)| {
                let evaluation_count = theirs.len();
                let average_raw_total =
                    theirs.iter().map(|e| e.raw_total()).sum::<f64>() / evaluation_count as f64;

                let mut project_titles: Vec<String> = Vec::new();
                for evaluation in &theirs {
                    let title = projects
                        .iter()
                        .find(|p| p.id == evaluation.project_id)
                        .map(|p| p.title.clone())
                        .unwrap_or_else(|| evaluation.project_id.clone());
                    if !project_titles.contains(&title) {
                        project_titles.push(title);
                    }
                }

                EvaluatorStats {
                    evaluator_id: evaluator_id.to_string(),
                    evaluator: theirs[0].evaluator_label().to_string(),
                    evaluation_count,
                    average_raw_total,
                    projects: project_titles,
                }
            })
            .collect()
    }
}

/// Summary statistics for the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Projects considered, including unsupported ones
    pub total_projects: u32,
    /// Projects with at least one evaluation
    pub evaluated: u32,
    /// Projects with no evaluations
    pub pending: u32,
    /// Evaluated projects at or above the approval threshold
    pub approved: u32,
    /// Evaluated projects below the approval threshold
    pub rejected: u32,
    /// Projects skipped for having an unknown category
    pub unsupported: u32,
    /// Distinct evaluators with at least one evaluation
    pub evaluators: u32,
    /// Project count per category
    pub projects_per_category: BTreeMap<String, u32>,
}

/// Complete scoring report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Report name
    pub name: String,
    /// Unique report ID
    pub report_id: String,
    /// When scoring started
    pub started_at: DateTime<Utc>,
    /// When the report was finalized
    pub completed_at: Option<DateTime<Utc>>,
    /// Scored projects, in snapshot order until finalized
    #[serde(skip)]
    pending_projects: Vec<ProjectReport>,
    /// Ranked projects per category, in order of first appearance
    pub categories: Vec<CategoryReport>,
    /// Projects skipped for an unknown category
    pub unsupported: Vec<UnsupportedProject>,
    /// Evaluator activity
    pub evaluators: Vec<EvaluatorStats>,
    /// Summary statistics
    pub summary: ReportSummary,
}

impl ScoreReport {
    pub fn new(name: &str, report_id: &str) -> Self {
        Self {
            name: name.to_string(),
            report_id: report_id.to_string(),
            started_at: Utc::now(),
            completed_at: None,
            pending_projects: Vec::new(),
            categories: Vec::new(),
            unsupported: Vec::new(),
            evaluators: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    /// Add a scored project
    pub fn add_project(&mut self, project: ProjectReport) {
        self.pending_projects.push(project);
    }

    /// Record a project that could not be scored
    pub fn add_unsupported(&mut self, project: UnsupportedProject) {
        self.unsupported.push(project);
    }

    pub fn set_evaluators(&mut self, evaluators: Vec<EvaluatorStats>) {
        self.evaluators = evaluators;
    }

    /// Group projects by category, rank them and fill in the summary
    pub fn calculate_rankings(&mut self) {
        let mut categories: Vec<CategoryReport> = Vec::new();

        for project in self.pending_projects.drain(..) {
            match categories.iter_mut().find(|c| c.category == project.category) {
                Some(existing) => existing.projects.push(project),
                None => categories.push(CategoryReport {
                    category: project.category.clone(),
                    projects: vec![project],
                }),
            }
        }

        for category in &mut categories {
            let projects = std::mem::take(&mut category.projects);
            category.projects = rank_projects(projects);
            for (i, project) in category.projects.iter_mut().enumerate() {
                project.rank = (i + 1) as u32;
            }
        }

        let all = || categories.iter().flat_map(|c| c.projects.iter());

        let mut projects_per_category: BTreeMap<String, u32> = BTreeMap::new();
        for category in &categories {
            *projects_per_category
                .entry(category.category.clone())
                .or_default() += category.projects.len() as u32;
        }
        for project in &self.unsupported {
            *projects_per_category
                .entry(project.category.clone())
                .or_default() += 1;
        }

        let scored = all().count() as u32;
        let evaluated = all().filter(|p| p.evaluation_count > 0).count() as u32;

        self.summary = ReportSummary {
            total_projects: scored + self.unsupported.len() as u32,
            evaluated,
            pending: scored - evaluated,
            approved: all()
                .filter(|p| p.status == ApprovalStatus::Approved)
                .count() as u32,
            rejected: all()
                .filter(|p| p.status == ApprovalStatus::Rejected)
                .count() as u32,
            unsupported: self.unsupported.len() as u32,
            evaluators: self.evaluators.len() as u32,
            projects_per_category,
        };

        self.categories = categories;
    }

    /// Finalize the report
    pub fn finalize(&mut self) {
        self.completed_at = Some(Utc::now());
        self.calculate_rankings();
    }

    pub fn category(&self, name: &str) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == name)
    }

    /// Find a scored project by id
    pub fn project(&self, project_id: &str) -> Option<&ProjectReport> {
        self.categories
            .iter()
            .flat_map(|c| c.projects.iter())
            .find(|p| p.project_id == project_id)
    }

    /// Top `count` evaluated projects of each category
    pub fn winners(&self, count: usize) -> Vec<(&str, Vec<&ProjectReport>)> {
        self.categories
            .iter()
            .map(|c| (c.category.as_str(), c.winners(count)))
            .filter(|(_, winners)| !winners.is_empty())
            .collect()
    }

    /// Save the report to a JSON file
    pub fn save_json(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate a human-readable Markdown report
    pub fn generate_report(&self, winners: usize) -> String {
        let mut report = String::new();

        report.push_str(&format!("# Score Report: {}\n\n", self.name));
        report.push_str(&format!("Report ID: {}\n", self.report_id));
        report.push_str(&format!("Started: {}\n", self.started_at));
        if let Some(completed) = self.completed_at {
            report.push_str(&format!("Completed: {}\n", completed));
        }
        report.push('\n');

        report.push_str("## Summary\n\n");
        report.push_str(&format!("- Projects: {}\n", self.summary.total_projects));
        report.push_str(&format!("- Evaluated: {}\n", self.summary.evaluated));
        report.push_str(&format!("- Pending: {}\n", self.summary.pending));
        report.push_str(&format!("- Approved: {}\n", self.summary.approved));
        report.push_str(&format!("- Rejected: {}\n", self.summary.rejected));
        if self.summary.unsupported > 0 {
            report.push_str(&format!(
                "- Unsupported category: {}\n",
                self.summary.unsupported
            ));
        }
        report.push_str(&format!("- Evaluators: {}\n", self.summary.evaluators));
        report.push('\n');

        report.push_str("### Projects per Category\n\n");
        for (category, count) in &self.summary.projects_per_category {
            report.push_str(&format!("- {}: {}\n", category, count));
        }
        report.push('\n');

        report.push_str("## Rankings\n\n");
        for category in &self.categories {
            report.push_str(&format!("### {}\n\n", category.category));
            report.push_str("| Rank | Project | Final Score | Evaluations | Status |\n");
            report.push_str("|------|---------|-------------|-------------|--------|\n");
            for project in &category.projects {
                report.push_str(&format!(
                    "| {} | {} | {:.2} | {} | {} |\n",
                    project.rank,
                    project.title,
                    project.final_score,
                    project.evaluation_count,
                    project.status
                ));
            }
            report.push('\n');
        }

        let winners = self.winners(winners);
        if !winners.is_empty() {
            report.push_str("## Winners\n\n");
            for (category, projects) in winners {
                report.push_str(&format!("### {}\n\n", category));
                for project in projects {
                    report.push_str(&format!(
                        "{}. {} ({:.2})\n",
                        project.rank, project.title, project.final_score
                    ));
                    for evaluation in &project.top_evaluations {
                        report.push_str(&format!(
                            "   - {}: {:.2}\n",
                            evaluation.evaluator, evaluation.raw_total
                        ));
                    }
                }
                report.push('\n');
            }
        }

        if !self.unsupported.is_empty() {
            report.push_str("## Unsupported Category\n\n");
            for project in &self.unsupported {
                report.push_str(&format!("- {} ({})\n", project.title, project.category));
            }
            report.push('\n');
        }

        if !self.evaluators.is_empty() {
            report.push_str("## Evaluators\n\n");
            report.push_str("| Evaluator | Evaluations | Avg Raw Total | Projects |\n");
            report.push_str("|-----------|-------------|---------------|----------|\n");
            for stats in &self.evaluators {
                report.push_str(&format!(
                    "| {} | {} | {:.2} | {} |\n",
                    stats.evaluator,
                    stats.evaluation_count,
                    stats.average_raw_total,
                    stats.projects.join(", ")
                ));
            }
        }

        report
    }
}
