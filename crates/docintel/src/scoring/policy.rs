use super::config::Thresholds;
use super::domain::{Priority, ScoreBreakdown};

pub const LIMITED_RELEVANCE: &str = "Limited cannabis relevance";

const REASONING_PHRASE_LIMIT: usize = 3;

/// Highest threshold met wins, checked from `high` downwards.
pub fn priority_for_score(score: i32, thresholds: &Thresholds) -> Priority {
    if score >= thresholds.high {
        Priority::HighPriority
    } else if score >= thresholds.medium {
        Priority::MediumPriority
    } else if score >= thresholds.low {
        Priority::LowPriority
    } else {
        Priority::Irrelevant
    }
}

pub(crate) fn build_reasoning(key_phrases: &[String], breakdown: &ScoreBreakdown) -> String {
    let mut parts = Vec::new();

    if !key_phrases.is_empty() {
        let leading: Vec<&str> = key_phrases
            .iter()
            .take(REASONING_PHRASE_LIMIT)
            .map(String::as_str)
            .collect();
        parts.push(format!("Found key phrases: {}", leading.join(", ")));
    }

    if breakdown.dates > 0 {
        parts.push(format!(
            "Recent dates detected (+{} points)",
            breakdown.dates
        ));
    }

    if breakdown.headings > 0 {
        parts.push(format!(
            "Keywords in headings (+{} points)",
            breakdown.headings
        ));
    }

    if parts.is_empty() {
        LIMITED_RELEVANCE.to_string()
    } else {
        parts.join("; ")
    }
}
