use anyhow::{bail, Result};
use clap::Parser;
use fair_eval::cli::{self, Args, Command, ScoringConfig};
use fair_eval::report::{list_evaluations, EvaluationFilter, ReportBuilder};
use fair_eval::rubric::criterion_key;
use fair_eval::store::Snapshot;
use fair_eval::{Aggregator, ApprovalStatus, EvaluationSource};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match args.command {
        Command::Report(report_args) => {
            build_report(report_args).await?;
        }
        Command::Score(score_args) => {
            score_project(score_args)?;
        }
        Command::Validate(validate_args) => {
            validate_evaluations(validate_args)?;
        }
        Command::Evaluations(evaluations_args) => {
            print_evaluations(evaluations_args)?;
        }
        Command::Rubric(rubric_args) => {
            print_rubrics(rubric_args)?;
        }
        Command::Init(init_args) => {
            generate_sample_config(init_args)?;
        }
    }

    Ok(())
}

async fn build_report(args: cli::ReportArgs) -> Result<()> {
    info!("Loading snapshot from {:?}", args.data);

    let config = ScoringConfig::load_or_default(args.config.as_deref())?;
    let snapshot = Snapshot::load(&args.data)?;

    for orphan in snapshot.orphan_evaluations() {
        warn!(
            "Evaluation by {} references unknown project {}",
            orphan.evaluator_id, orphan.project_id
        );
    }

    let mut options = config.report_options(args.category);
    if let Some(parallelism) = args.parallelism {
        options.parallelism = parallelism;
    }
    let winners = options.winners;

    let builder = ReportBuilder::new(config.rubric_table()?, options);
    let report = builder.build(&snapshot).await?;

    print_summary(&report, winners);

    if let Some(output_dir) = args.output {
        builder.save_results(&output_dir).await?;
        println!("\nReport saved to: {:?}", output_dir);
    }

    Ok(())
}

fn print_summary(report: &fair_eval::report::ScoreReport, winners: usize) {
    println!("\n{}", "=".repeat(60));
    println!("SCORE REPORT: {}", report.name);
    println!("{}", "=".repeat(60));
    println!("\nSummary:");
    println!("  Projects: {}", report.summary.total_projects);
    println!("  Evaluated: {}", report.summary.evaluated);
    println!("  Pending: {}", report.summary.pending);
    println!("  Approved: {}", report.summary.approved);
    println!("  Rejected: {}", report.summary.rejected);
    if report.summary.unsupported > 0 {
        println!("  Unsupported category: {}", report.summary.unsupported);
    }

    for (category, projects) in report.winners(winners) {
        println!("\n{}:", category);
        for project in projects {
            println!(
                "  #{} {} - {:.2} ({} evaluations)",
                project.rank, project.title, project.final_score, project.evaluation_count
            );
        }
    }

    for project in &report.unsupported {
        println!(
            "\n  {} - unsupported category {:?}, no score",
            project.title, project.category
        );
    }
}

fn score_project(args: cli::ScoreArgs) -> Result<()> {
    let config = ScoringConfig::load_or_default(args.config.as_deref())?;
    let snapshot = Snapshot::load(&args.data)?;
    let table = config.rubric_table()?;

    let Some(project) = snapshot.project(&args.project) else {
        bail!("Project not found: {}", args.project);
    };
    let evaluations = snapshot.evaluations_for(&project.id);

    let result = match Aggregator::new(&table)
        .with_offset(config.settings.offset)
        .aggregate(&project.category, &evaluations)
    {
        Ok(result) => result,
        Err(e) => {
            println!("{}: {}", project, e);
            return Ok(());
        }
    };

    let status = ApprovalStatus::classify(
        result.final_score,
        result.evaluation_count(),
        config.settings.approval_threshold,
    );

    println!("{}", project);
    println!("  Final score: {:.2} ({})", result.final_score, status);
    for (evaluation, score) in evaluations.iter().zip(&result.per_evaluation_scores) {
        println!(
            "  - {}: standardized {:.2}, raw total {:.2}",
            evaluation.evaluator_label(),
            score,
            evaluation.raw_total()
        );
        if let Some(ref comment) = evaluation.comment {
            println!("      \"{}\"", comment);
        }
    }

    Ok(())
}

fn validate_evaluations(args: cli::ValidateArgs) -> Result<()> {
    let config = ScoringConfig::load_or_default(args.config.as_deref())?;
    let snapshot = Snapshot::load(&args.data)?;
    let table = config.rubric_table()?;

    let mut problems = 0;
    for evaluation in &snapshot.evaluations {
        let Some(category) = snapshot.category_of(&evaluation.project_id) else {
            println!(
                "{} / {}: unknown project",
                evaluation.project_id, evaluation.evaluator_id
            );
            problems += 1;
            continue;
        };

        let outcome = table
            .get(&category)
            .map_err(anyhow::Error::from)
            .and_then(|rubric| rubric.validate(&evaluation.scores).map_err(Into::into));

        if let Err(e) = outcome {
            println!(
                "{} / {}: {}",
                evaluation.project_id, evaluation.evaluator_id, e
            );
            problems += 1;
        }
    }

    println!(
        "\nChecked {} evaluations: {} problem(s)",
        snapshot.evaluations.len(),
        problems
    );

    if problems > 0 {
        bail!("{} evaluation(s) failed validation", problems);
    }

    Ok(())
}

fn print_evaluations(args: cli::EvaluationsArgs) -> Result<()> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            bail!("--from {} is after --to {}", from, to);
        }
    }

    let snapshot = Snapshot::load(&args.data)?;
    let filter = EvaluationFilter {
        project: args.project,
        evaluator: args.evaluator,
        category: args.category,
        from: args.from,
        to: args.to,
    };

    let entries = list_evaluations(&snapshot, &filter);
    info!(
        "{} of {} evaluations match",
        entries.len(),
        snapshot.evaluations.len()
    );

    for entry in &entries {
        let when = entry
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        match (&entry.project_title, &entry.category) {
            (Some(title), Some(category)) => println!("{}  {} [{}]", when, title, category),
            _ => println!("{}  {} (unknown project)", when, entry.project_id),
        }
        println!("    {}: raw total {:.2}", entry.evaluator, entry.raw_total);
        if let Some(ref comment) = entry.comment {
            println!("    \"{}\"", comment);
        }
    }

    println!("\nTotal: {}", entries.len());

    Ok(())
}

fn print_rubrics(args: cli::RubricArgs) -> Result<()> {
    let config = ScoringConfig::load_or_default(args.config.as_deref())?;
    let table = config.rubric_table()?;

    match args.category {
        Some(category) => print!("{}", table.get(&category)?),
        None => {
            for rubric in table.iter() {
                println!("{}", rubric);
            }
        }
    }

    println!(
        "Scores are keyed {}..Ck; missing keys count as 0 when aggregating.",
        criterion_key(1)
    );

    Ok(())
}

fn generate_sample_config(args: cli::InitArgs) -> Result<()> {
    let config = ScoringConfig::sample();

    config.save(&args.output)?;
    println!("Generated sample config at: {:?}", args.output);

    Ok(())
}
