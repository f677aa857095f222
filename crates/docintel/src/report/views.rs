use crate::scoring::ClassificationResult;
use serde::{Deserialize, Serialize};

/// Flat, export-friendly rendering of a [`ClassificationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationView {
    pub document_name: String,
    pub classification: String,
    pub score: i32,
    pub reasoning: String,
    pub key_phrases: Vec<String>,
    pub recommended_action: String,
    pub processed_at: String,
}

impl From<&ClassificationResult> for ClassificationView {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            document_name: result.document_name.clone(),
            classification: result.classification.label().to_string(),
            score: result.score,
            reasoning: result.reasoning.clone(),
            key_phrases: result.key_phrases.clone(),
            recommended_action: result.recommended_action.label().to_string(),
            processed_at: result.processed_at.to_rfc3339(),
        }
    }
}

/// Counts and average score over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub total_documents: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub irrelevant: usize,
    pub average_score: f64,
}
