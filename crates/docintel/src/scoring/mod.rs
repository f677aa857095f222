//! Deterministic, explainable relevance scoring for municipal documents.
//!
//! A document's score is the sum of keyword tiers, context modifiers, a bonus per
//! date near the reference instant, and a heading/document-name bonus. The score
//! is then bucketed into a [`Priority`] by the configured thresholds.

mod clock;
mod config;
mod dates;
mod domain;
mod policy;
mod rules;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    DateBonus, HeadingBonus, KeywordTable, KeywordTier, ModifierTable, ScoringConfig, Thresholds,
    Tier, MAX_WEIGHT,
};
pub use dates::{DateExtractor, DatePattern};
pub use domain::{ClassificationResult, Priority, RecommendedAction, ScoreBreakdown};
pub use policy::{priority_for_score, LIMITED_RELEVANCE};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Error raised while building an engine or loading scoring tables.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("thresholds must be strictly descending (high {high}, medium {medium}, low {low})")]
    InvalidThresholds { high: i32, medium: i32, low: i32 },
    #[error("{field} must not be negative (got {value})")]
    NegativeWeight { field: &'static str, value: i64 },
    #[error("{field} must be at most {max} (got {value})")]
    WeightTooLarge {
        field: &'static str,
        value: i64,
        max: i64,
    },
    #[error("{table} contains a blank phrase")]
    EmptyPhrase { table: &'static str },
    #[error("failed to read scoring tables from {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid scoring tables: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid date pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Stateless scorer; safe to share across threads once built.
pub struct ScoringEngine {
    config: ScoringConfig,
    dates: DateExtractor,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("config", &self.config)
            .field("dates", &self.dates)
            .finish_non_exhaustive()
    }
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn standard() -> Result<Self, ScoringError> {
        Self::new(ScoringConfig::standard())
    }

    pub fn with_clock(config: ScoringConfig, clock: Arc<dyn Clock>) -> Result<Self, ScoringError> {
        let dates = DateExtractor::english()?;
        Self::with_parts(config, dates, clock)
    }

    /// Builds an engine with a custom date pattern set.
    pub fn with_parts(
        config: ScoringConfig,
        dates: DateExtractor,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            config,
            dates,
            clock,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Current instant according to the engine clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Classifies `text` against the engine clock's current instant.
    pub fn classify(&self, text: &str, document_name: &str) -> ClassificationResult {
        let now = self.clock.now();
        self.classify_at(text, document_name, now)
    }

    /// Classifies `text` with `now` as both the date-window reference and
    /// `processed_at`.
    pub fn classify_at(
        &self,
        text: &str,
        document_name: &str,
        now: DateTime<Utc>,
    ) -> ClassificationResult {
        let signals = rules::score_document(
            text,
            document_name,
            &self.config,
            &self.dates,
            now.date_naive(),
        );

        let score = signals.breakdown.total();
        let classification = priority_for_score(score, &self.config.thresholds);
        let reasoning = policy::build_reasoning(&signals.key_phrases, &signals.breakdown);

        debug!(
            document = document_name,
            score,
            classification = classification.label(),
            "document classified"
        );

        ClassificationResult {
            document_name: document_name.to_string(),
            score,
            classification,
            key_phrases: signals.key_phrases,
            reasoning,
            recommended_action: classification.recommended_action(),
            breakdown: signals.breakdown,
            processed_at: now,
        }
    }

    /// Classifies each `(name, text)` pair independently; results keep input order.
    pub fn classify_all<I, N, T>(&self, documents: I) -> Vec<ClassificationResult>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str> + Sync,
        T: AsRef<str> + Sync,
    {
        let documents: Vec<(N, T)> = documents.into_iter().collect();
        documents
            .par_iter()
            .map(|(name, text)| self.classify(text.as_ref(), name.as_ref()))
            .collect()
    }

    /// Batch variant of [`Self::classify_at`] sharing one reference instant.
    pub fn classify_all_at<I, N, T>(&self, documents: I, now: DateTime<Utc>) -> Vec<ClassificationResult>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str> + Sync,
        T: AsRef<str> + Sync,
    {
        let documents: Vec<(N, T)> = documents.into_iter().collect();
        documents
            .par_iter()
            .map(|(name, text)| self.classify_at(text.as_ref(), name.as_ref(), now))
            .collect()
    }
}
