use crate::commands::print_result;
use crate::infra::{build_engine, reference_time};
use chrono::NaiveDate;
use clap::Args;
use docintel::config::AppConfig;
use docintel::dispatch::{
    DispatchReport, JsonFileLog, NotificationDispatcher, TracingAlertChannel,
    TracingDigestChannel,
};
use docintel::ingest::collect_documents;
use docintel::report::{
    render_automation_report, render_methodology, render_summary_report, write_csv_file,
    write_json_file, ClassificationSummary, ExportError,
};
use docintel::samples::write_sample_documents;
use docintel::scoring::ScoringEngine;
use docintel::{telemetry, AppError, ClassificationResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Directory receiving the sample documents, exports and reports
    #[arg(long, default_value = "demo_output")]
    pub(crate) output_dir: PathBuf,
    /// Reference date for the date window (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Outcome of a demo run.
#[derive(Debug)]
pub(crate) struct DemoArtifacts {
    pub(crate) results: Vec<ClassificationResult>,
    pub(crate) dispatch: DispatchReport,
    pub(crate) files: Vec<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let engine = build_engine(&config)?;

    println!("Cannabis Document Intelligence System");
    println!("{}", "=".repeat(50));

    let artifacts = execute_demo(
        &engine,
        &config.automation.digest_recipients,
        &args.output_dir,
        args.today,
    )?;

    for result in &artifacts.results {
        print_result(result);
    }
    println!("{}", render_summary_report(&artifacts.results));

    let summary = ClassificationSummary::from_results(&artifacts.results);
    println!("Files generated:");
    for file in &artifacts.files {
        println!("  - {}", file.display());
    }
    println!("\nSummary:");
    println!("  Total Documents: {}", summary.total_documents);
    println!("  High Priority: {}", summary.high_priority);
    println!("  Medium Priority: {}", summary.medium_priority);
    println!("  Low Priority: {}", summary.low_priority);
    println!("  Irrelevant: {}", summary.irrelevant);
    if artifacts.dispatch.has_failures() {
        println!("  Some notification channels failed; see the log for details.");
    }

    Ok(())
}

/// Writes the samples under `output_dir`, classifies them from disk, dispatches
/// them and saves every report next to them.
pub(crate) fn execute_demo(
    engine: &ScoringEngine,
    recipients: &[String],
    output_dir: &Path,
    today: Option<NaiveDate>,
) -> Result<DemoArtifacts, AppError> {
    let now = reference_time(engine, today);
    let documents_dir = output_dir.join("sample_documents");
    write_sample_documents(&documents_dir)?;

    let collected = collect_documents(&documents_dir)?;
    let results = engine.classify_all_at(collected.documents, now);

    let log = Arc::new(JsonFileLog::new(output_dir.join("automation_log.json")));
    let dispatcher = NotificationDispatcher::new(
        Arc::new(TracingAlertChannel),
        Arc::new(TracingDigestChannel),
        log,
        recipients.to_vec(),
    );
    let dispatch = dispatcher.dispatch(&results, now);

    let mut files = Vec::new();

    let json_path = output_dir.join("classification_results.json");
    write_json_file(&results, &json_path)?;
    files.push(json_path);

    let csv_path = output_dir.join("classification_results.csv");
    write_csv_file(&results, &csv_path)?;
    files.push(csv_path);

    let automation_path = output_dir.join("automation_results.json");
    let encoded = serde_json::to_vec_pretty(&dispatch).map_err(ExportError::from)?;
    fs::write(&automation_path, encoded)?;
    files.push(automation_path);

    let reports = [
        ("summary_report.txt", render_summary_report(&results)),
        (
            "automation_report.txt",
            render_automation_report(&results, &dispatcher.log_target(), now),
        ),
        ("methodology.txt", render_methodology(engine.config())),
    ];
    for (name, body) in reports {
        let path = output_dir.join(name);
        fs::write(&path, body)?;
        files.push(path);
    }

    Ok(DemoArtifacts {
        results,
        dispatch,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docintel::samples::SAMPLE_DOCUMENTS;
    use docintel::scoring::{FixedClock, ScoringConfig};
    use docintel::Priority;

    #[test]
    fn demo_writes_every_artifact() {
        let dir = tempfile::tempdir().expect("temp dir");
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        let engine = ScoringEngine::with_clock(
            ScoringConfig::standard(),
            Arc::new(FixedClock::on_date(today)),
        )
        .expect("engine builds");

        let artifacts = execute_demo(
            &engine,
            &["stakeholders@yourcompany.com".to_string()],
            dir.path(),
            Some(today),
        )
        .expect("demo runs");

        assert_eq!(artifacts.results.len(), SAMPLE_DOCUMENTS.len());
        assert_eq!(artifacts.files.len(), 6);
        assert!(artifacts.files.iter().all(|path| path.exists()));
        assert!(artifacts
            .results
            .iter()
            .any(|result| result.classification == Priority::HighPriority));
        assert!(!artifacts.dispatch.has_failures());

        let summary =
            fs::read_to_string(dir.path().join("summary_report.txt")).expect("summary report");
        assert!(summary.contains("Total Documents Processed: 15"));
    }
}
