use super::views::ClassificationView;
use crate::scoring::ClassificationResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode JSON export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode CSV export: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    document_name: &'a str,
    classification: &'a str,
    score: i32,
    reasoning: &'a str,
    key_phrases: String,
    recommended_action: &'a str,
    processed_at: &'a str,
}

/// Writes the batch as a pretty-printed JSON array of [`ClassificationView`]s.
pub fn export_json<W: Write>(results: &[ClassificationResult], writer: W) -> Result<(), ExportError> {
    let views: Vec<ClassificationView> = results.iter().map(ClassificationView::from).collect();
    serde_json::to_writer_pretty(writer, &views)?;
    Ok(())
}

/// Writes the batch as CSV with a header row; key phrases are joined by `"; "`.
pub fn export_csv<W: Write>(results: &[ClassificationResult], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for result in results {
        let view = ClassificationView::from(result);
        csv_writer.serialize(CsvRow {
            document_name: &view.document_name,
            classification: &view.classification,
            score: view.score,
            reasoning: &view.reasoning,
            key_phrases: view.key_phrases.join("; "),
            recommended_action: &view.recommended_action,
            processed_at: &view.processed_at,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_json_file<P: AsRef<Path>>(
    results: &[ClassificationResult],
    path: P,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    export_json(results, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(
    results: &[ClassificationResult],
    path: P,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    export_csv(results, BufWriter::new(file))
}
