use super::results::{EvaluatorStats, ProjectReport, ScoreReport, UnsupportedProject};
use crate::error::ScoringError;
use crate::ranking::{top_evaluations, ApprovalStatus};
use crate::rubric::RubricTable;
use crate::scoring::Aggregator;
use crate::store::{Evaluation, EvaluationSource, Project};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Settings that shape a report
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Report name
    pub name: String,
    /// Offset added to standardized marks
    pub offset: f64,
    /// Final score at or above which a project is approved
    pub approval_threshold: f64,
    /// Length of each project's evaluation display list
    pub top_evaluations: usize,
    /// Winners listed per category
    pub winners: usize,
    /// Projects scored concurrently
    pub parallelism: usize,
    /// Restrict the report to one category
    pub category: Option<String>,
}

/// Outcome of scoring one project
#[derive(Debug, Clone)]
enum ProjectOutcome {
    Scored(ProjectReport),
    Unsupported(UnsupportedProject),
}

/// Builds score reports from an evaluation source
pub struct ReportBuilder {
    rubrics: Arc<RubricTable>,
    options: ReportOptions,
    results: Arc<Mutex<ScoreReport>>,
}

impl ReportBuilder {
    /// Create a new ReportBuilder
    pub fn new(rubrics: RubricTable, options: ReportOptions) -> Self {
        let report_id = Uuid::new_v4().to_string();
        let results = Arc::new(Mutex::new(ScoreReport::new(&options.name, &report_id)));

        Self {
            rubrics: Arc::new(rubrics),
            options,
            results,
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Score every project of `source` and assemble the ranked report.
    ///
    /// All projects and evaluations are read up front; aggregation then runs
    /// over that frozen copy, never re-reading the source.
    pub async fn build<S: EvaluationSource>(&self, source: &S) -> Result<ScoreReport> {
        let report_id = {
            let mut results = self.results.lock().await;
            let report_id = results.report_id.clone();
            *results = ScoreReport::new(&self.options.name, &report_id);
            report_id
        };

        let projects: Vec<Project> = source
            .projects()
            .into_iter()
            .filter(|p| {
                self.options
                    .category
                    .as_ref()
                    .map_or(true, |category| &p.category == category)
            })
            .collect();

        let work: Vec<(Project, Vec<Evaluation>)> = projects
            .into_iter()
            .map(|p| {
                let evaluations = source.evaluations_for(&p.id);
                (p, evaluations)
            })
            .collect();

        info!(
            "Building report: {} (ID: {}) for {} projects with parallelism {}",
            self.options.name,
            report_id,
            work.len(),
            self.options.parallelism
        );

        let all_evaluations: Vec<Evaluation> =
            work.iter().flat_map(|(_, evals)| evals.iter().cloned()).collect();
        let all_projects: Vec<Project> = work.iter().map(|(p, _)| p.clone()).collect();

        // Outcomes are slotted by snapshot position so ranking ties resolve
        // in store order no matter which task finishes first.
        let outcomes: Arc<Mutex<Vec<Option<ProjectOutcome>>>> =
            Arc::new(Mutex::new(vec![None; work.len()]));
        let semaphore = Arc::new(tokio::sync::Semaphore::new(
            self.options.parallelism.max(1),
        ));
        let mut handles = Vec::new();

        for (position, (project, evaluations)) in work.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("Scoring semaphore closed")?;
            let rubrics = Arc::clone(&self.rubrics);
            let options = self.options.clone();
            let outcomes = Arc::clone(&outcomes);

            let handle = tokio::spawn(async move {
                let outcome = score_project(&rubrics, &options, &project, &evaluations);

                {
                    let mut outcomes_guard = outcomes.lock().await;
                    outcomes_guard[position] = Some(outcome);
                }

                drop(permit);
            });

            handles.push(handle);
        }

        for handle in handles {
            handle.await?;
        }

        let mut final_results = self.results.lock().await;
        for outcome in outcomes.lock().await.drain(..).flatten() {
            match outcome {
                ProjectOutcome::Scored(project) => final_results.add_project(project),
                ProjectOutcome::Unsupported(project) => final_results.add_unsupported(project),
            }
        }
        final_results.set_evaluators(EvaluatorStats::collect(&all_evaluations, &all_projects));
        final_results.finalize();

        info!(
            "Report {} complete: {} evaluated, {} pending, {} unsupported",
            report_id,
            final_results.summary.evaluated,
            final_results.summary.pending,
            final_results.summary.unsupported
        );

        Ok(final_results.clone())
    }

    /// Get the current results
    pub async fn results(&self) -> ScoreReport {
        self.results.lock().await.clone()
    }

    /// Save the report as JSON and Markdown into `output_dir`.
    ///
    /// Fails if `build` has not completed yet.
    pub async fn save_results(&self, output_dir: &Path) -> Result<()> {
        let results = self.results.lock().await;
        if results.completed_at.is_none() {
            bail!("No report to save: build has not completed");
        }

        std::fs::create_dir_all(output_dir)
            .context(format!("Failed to create output directory: {:?}", output_dir))?;

        let json_path = output_dir.join(format!("{}.json", results.report_id));
        results.save_json(&json_path)?;
        info!("Saved results to {:?}", json_path);

        let report_path = output_dir.join(format!("{}_report.md", results.report_id));
        let report = results.generate_report(self.options.winners);
        std::fs::write(&report_path, report)?;
        info!("Saved report to {:?}", report_path);

        Ok(())
    }
}

/// Score a single project against the rubric table
fn score_project(
    rubrics: &RubricTable,
    options: &ReportOptions,
    project: &Project,
    evaluations: &[Evaluation],
) -> ProjectOutcome {
    let aggregator = Aggregator::new(rubrics).with_offset(options.offset);

    match aggregator.aggregate(&project.category, evaluations) {
        Ok(result) => {
            debug!(
                "Scored project {} ({}) from {} evaluations: {:.4}",
                project.id,
                project.category,
                result.evaluation_count(),
                result.final_score
            );
            ProjectOutcome::Scored(ProjectReport {
                project_id: project.id.clone(),
                title: project.title.clone(),
                category: project.category.clone(),
                rank: 0,
                final_score: result.final_score,
                evaluation_count: result.evaluation_count(),
                status: ApprovalStatus::classify(
                    result.final_score,
                    result.evaluation_count(),
                    options.approval_threshold,
                ),
                top_evaluations: top_evaluations(evaluations, options.top_evaluations),
                per_evaluation_scores: result.per_evaluation_scores,
            })
        }
        Err(ScoringError::UnknownCategory(category)) => {
            warn!(
                "Skipping project {}: unsupported category {:?}",
                project.id, category
            );
            ProjectOutcome::Unsupported(UnsupportedProject {
                project_id: project.id.clone(),
                title: project.title.clone(),
                category,
            })
        }
    }
}
