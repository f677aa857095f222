use super::views::ClassificationSummary;
use crate::scoring::{ClassificationResult, Priority};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

impl ClassificationSummary {
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let count = |priority: Priority| {
            results
                .iter()
                .filter(|result| result.classification == priority)
                .count()
        };

        let average_score = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|result| f64::from(result.score)).sum::<f64>() / results.len() as f64
        };

        Self {
            total_documents: results.len(),
            high_priority: count(Priority::HighPriority),
            medium_priority: count(Priority::MediumPriority),
            low_priority: count(Priority::LowPriority),
            irrelevant: count(Priority::Irrelevant),
            average_score,
        }
    }

    pub fn count_for(&self, priority: Priority) -> usize {
        match priority {
            Priority::HighPriority => self.high_priority,
            Priority::MediumPriority => self.medium_priority,
            Priority::LowPriority => self.low_priority,
            Priority::Irrelevant => self.irrelevant,
        }
    }
}

/// Human-readable batch summary followed by the HIGH priority documents.
pub fn render_summary_report(results: &[ClassificationResult]) -> String {
    let summary = ClassificationSummary::from_results(results);
    let mut report = String::new();

    writeln!(report, "Cannabis Document Classification Summary").expect("write summary title");
    writeln!(report, "=======================================").expect("write summary rule");
    writeln!(report, "Total Documents Processed: {}", summary.total_documents)
        .expect("write document total");
    for priority in Priority::ordered() {
        writeln!(
            report,
            "{}: {}",
            priority.display_name(),
            summary.count_for(priority)
        )
        .expect("write priority count");
    }
    writeln!(report, "Average Score: {:.1}", summary.average_score).expect("write average score");

    writeln!(report, "\nHigh Priority Documents:").expect("write high priority heading");
    let mut any_high = false;
    for result in results
        .iter()
        .filter(|result| result.classification == Priority::HighPriority)
    {
        any_high = true;
        writeln!(
            report,
            "- {} (Score: {}) - {}",
            result.document_name, result.score, result.reasoning
        )
        .expect("write high priority document");
    }
    if !any_high {
        writeln!(report, "- none").expect("write empty high priority list");
    }

    report
}

/// Channel-oriented report describing which workflows a batch triggers.
pub fn render_automation_report(
    results: &[ClassificationResult],
    log_target: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let summary = ClassificationSummary::from_results(results);
    let mut report = String::new();

    writeln!(report, "Automation Workflow Report").expect("write automation title");
    writeln!(report, "=========================").expect("write automation rule");
    writeln!(
        report,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
    .expect("write generated at");

    writeln!(report, "\nDocument Distribution:").expect("write distribution heading");
    writeln!(
        report,
        "- High Priority (Immediate Alerts): {}",
        summary.high_priority
    )
    .expect("write high priority count");
    writeln!(
        report,
        "- Medium Priority (Weekly Digest): {}",
        summary.medium_priority
    )
    .expect("write medium priority count");
    writeln!(report, "- Low Priority (Logged): {}", summary.low_priority)
        .expect("write low priority count");
    writeln!(report, "- Irrelevant (Ignored): {}", summary.irrelevant)
        .expect("write irrelevant count");

    writeln!(report, "\nWorkflows Executed:").expect("write workflows heading");
    if summary.high_priority > 0 {
        writeln!(
            report,
            "* {} alerts sent for immediate follow-up",
            summary.high_priority
        )
        .expect("write alert workflow");
    }
    if summary.medium_priority > 0 {
        writeln!(
            report,
            "* Weekly digest prepared with {} documents",
            summary.medium_priority
        )
        .expect("write digest workflow");
    }
    if summary.low_priority > 0 {
        writeln!(
            report,
            "* {} documents logged to {}",
            summary.low_priority, log_target
        )
        .expect("write log workflow");
    }
    if summary.high_priority + summary.medium_priority + summary.low_priority == 0 {
        writeln!(report, "* none").expect("write empty workflow list");
    }

    report
}
