mod export;
mod methodology;
mod summary;
pub mod views;

pub use export::{export_csv, export_json, write_csv_file, write_json_file, ExportError};
pub use methodology::render_methodology;
pub use summary::{render_automation_report, render_summary_report};
pub use views::{ClassificationSummary, ClassificationView};
