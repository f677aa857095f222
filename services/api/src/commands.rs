use crate::infra::{build_engine, live_dispatcher, reference_time};
use chrono::NaiveDate;
use clap::Args;
use docintel::config::AppConfig;
use docintel::ingest::{collect_documents, read_document};
use docintel::report::{
    render_automation_report, render_methodology, render_summary_report, write_csv_file,
    write_json_file,
};
use docintel::{telemetry, AppError, ClassificationResult};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Document to classify (.txt, .pdf or .docx)
    pub(crate) path: PathBuf,
    /// Name used for the document-name bonus (defaults to the file name)
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Reference date for the date window (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Directory walked recursively for documents
    pub(crate) dir: PathBuf,
    /// Write the results as a JSON array to this path
    #[arg(long)]
    pub(crate) json: Option<PathBuf>,
    /// Write the results as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Print the classification summary report
    #[arg(long)]
    pub(crate) summary: bool,
    /// Route results through the configured notification channels
    #[arg(long)]
    pub(crate) dispatch: bool,
    /// Reference date for the date window (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let ClassifyArgs { path, name, today } = args;
    let engine = build_engine(&config)?;
    let text = read_document(&path)?;
    let name = name.unwrap_or_else(|| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    });

    let result = engine.classify_at(&text, &name, reference_time(&engine, today));
    print_result(&result);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let engine = build_engine(&config)?;
    let now = reference_time(&engine, args.today);

    let collected = collect_documents(&args.dir)?;
    for skipped in &collected.skipped {
        println!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    info!(
        documents = collected.documents.len(),
        skipped = collected.skipped.len(),
        dir = %args.dir.display(),
        "documents collected"
    );

    let results = engine.classify_all_at(collected.documents, now);
    for result in &results {
        print_result(result);
    }

    if args.summary {
        println!("{}", render_summary_report(&results));
    }

    if let Some(path) = &args.json {
        write_json_file(&results, path)?;
        println!("Classification results saved to: {}", path.display());
    }
    if let Some(path) = &args.csv {
        write_csv_file(&results, path)?;
        println!("Classification results saved to: {}", path.display());
    }

    if args.dispatch {
        let dispatcher = live_dispatcher(&config);
        let report = dispatcher.dispatch(&results, now);
        println!(
            "{}",
            render_automation_report(&results, &dispatcher.log_target(), now)
        );
        if report.has_failures() {
            println!("One or more notification channels failed; see the log for details.");
        }
    }

    Ok(())
}

pub(crate) fn run_methodology() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    println!("{}", render_methodology(&config.scoring));
    Ok(())
}

pub(crate) fn print_result(result: &ClassificationResult) {
    println!("[{}] {}", result.classification.display_name(), result.document_name);
    println!(
        "   Score: {} | Classification: {}",
        result.score, result.classification
    );
    println!("   Reasoning: {}", result.reasoning);
    if !result.key_phrases.is_empty() {
        let leading: Vec<&str> = result
            .key_phrases
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        println!("   Key Phrases: {}", leading.join(", "));
    }
    println!("   Recommended Action: {}", result.recommended_action);
    println!();
}
