use crate::scoring::ClassificationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const ALERT_PHRASE_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AlertField {
    fn new(title: &str, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short,
        }
    }
}

/// Chat-style alert raised for each HIGH priority document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub document_name: String,
    pub text: String,
    pub color: String,
    pub fields: Vec<AlertField>,
    pub footer: String,
}

impl AlertMessage {
    pub fn for_result(result: &ClassificationResult) -> Self {
        let phrases: Vec<&str> = result
            .key_phrases
            .iter()
            .take(ALERT_PHRASE_LIMIT)
            .map(String::as_str)
            .collect();

        Self {
            document_name: result.document_name.clone(),
            text: "HIGH PRIORITY CANNABIS DOCUMENT DETECTED".to_string(),
            color: "#ff0000".to_string(),
            fields: vec![
                AlertField::new("Document", result.document_name.clone(), true),
                AlertField::new("Score", result.score.to_string(), true),
                AlertField::new("Reasoning", result.reasoning.clone(), false),
                AlertField::new("Key Phrases", phrases.join(", "), false),
                AlertField::new(
                    "Recommended Action",
                    "IMMEDIATE FOLLOW-UP REQUIRED",
                    false,
                ),
            ],
            footer: format!(
                "Processed at {}",
                result.processed_at.format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }
}

/// Periodic digest covering every MEDIUM priority document in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestMessage {
    pub subject: String,
    pub recipients: Vec<String>,
    pub document_names: Vec<String>,
    pub html_body: String,
}

impl DigestMessage {
    pub fn for_results(
        results: &[&ClassificationResult],
        recipients: &[String],
        now: DateTime<Utc>,
    ) -> Self {
        let date = now.format("%Y-%m-%d").to_string();

        Self {
            subject: format!("Weekly Cannabis Document Digest - {date}"),
            recipients: recipients.to_vec(),
            document_names: results
                .iter()
                .map(|result| result.document_name.clone())
                .collect(),
            html_body: render_digest_html(results, &date),
        }
    }

    pub fn document_count(&self) -> usize {
        self.document_names.len()
    }
}

fn render_digest_html(results: &[&ClassificationResult], date: &str) -> String {
    let mut html = String::new();

    let _ = writeln!(html, "<html>\n<body>");
    let _ = writeln!(html, "<div class=\"header\">");
    let _ = writeln!(html, "<h2>Weekly Cannabis Document Digest</h2>");
    let _ = writeln!(html, "<p>Date: {date}</p>");
    let _ = writeln!(
        html,
        "<p>Total Medium Priority Documents: {}</p>",
        results.len()
    );
    let _ = writeln!(html, "</div>");

    for result in results {
        let _ = writeln!(html, "<div class=\"document\">");
        let _ = writeln!(
            html,
            "<h3>{}</h3>",
            html_escape::encode_text(&result.document_name)
        );
        let _ = writeln!(html, "<p><span class=\"score\">Score: {}</span></p>", result.score);
        let _ = writeln!(
            html,
            "<p><strong>Reasoning:</strong> {}</p>",
            html_escape::encode_text(&result.reasoning)
        );
        let _ = writeln!(
            html,
            "<p class=\"key-phrases\"><strong>Key Phrases:</strong> {}</p>",
            html_escape::encode_text(&result.key_phrases.join(", "))
        );
        let _ = writeln!(
            html,
            "<p><strong>Recommended Action:</strong> Monitor and plan</p>"
        );
        let _ = writeln!(html, "</div>");
    }

    let _ = writeln!(html, "</body>\n</html>");
    html
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedDocument {
    pub document_name: String,
    pub score: i32,
    pub reasoning: String,
    pub key_phrases: Vec<String>,
    pub processed_at: DateTime<Utc>,
}

/// Durable log record appended for the LOW priority documents of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub document_count: usize,
    pub documents: Vec<LoggedDocument>,
}

impl LogEntry {
    pub fn for_results(results: &[&ClassificationResult], now: DateTime<Utc>) -> Self {
        let documents: Vec<LoggedDocument> = results
            .iter()
            .map(|result| LoggedDocument {
                document_name: result.document_name.clone(),
                score: result.score,
                reasoning: result.reasoning.clone(),
                key_phrases: result.key_phrases.clone(),
                processed_at: result.processed_at,
            })
            .collect();

        Self {
            timestamp: now,
            action: "low_priority_log".to_string(),
            document_count: documents.len(),
            documents,
        }
    }
}
