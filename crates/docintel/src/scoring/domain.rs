use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relevance classification, ordered by severity (`HighPriority` is greatest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Irrelevant,
    LowPriority,
    MediumPriority,
    HighPriority,
}

impl Priority {
    /// Descending severity order used by reports and dispatch.
    pub const fn ordered() -> [Self; 4] {
        [
            Self::HighPriority,
            Self::MediumPriority,
            Self::LowPriority,
            Self::Irrelevant,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighPriority => "HIGH_PRIORITY",
            Self::MediumPriority => "MEDIUM_PRIORITY",
            Self::LowPriority => "LOW_PRIORITY",
            Self::Irrelevant => "IRRELEVANT",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::HighPriority => "High Priority",
            Self::MediumPriority => "Medium Priority",
            Self::LowPriority => "Low Priority",
            Self::Irrelevant => "Irrelevant",
        }
    }

    pub const fn recommended_action(self) -> RecommendedAction {
        match self {
            Self::HighPriority => RecommendedAction::ImmediateFollowUp,
            Self::MediumPriority => RecommendedAction::WeeklyDigest,
            Self::LowPriority => RecommendedAction::LogOnly,
            Self::Irrelevant => RecommendedAction::Ignore,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Downstream routing decision, one-to-one with [`Priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    ImmediateFollowUp,
    WeeklyDigest,
    LogOnly,
    Ignore,
}

impl RecommendedAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ImmediateFollowUp => "immediate_follow_up",
            Self::WeeklyDigest => "weekly_digest",
            Self::LogOnly => "log_only",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-pass contributions to a document score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keywords: i32,
    pub modifiers: i32,
    pub dates: i32,
    pub headings: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.keywords
            .saturating_add(self.modifiers)
            .saturating_add(self.dates)
            .saturating_add(self.headings)
    }
}

/// Immutable outcome of classifying one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub document_name: String,
    pub score: i32,
    pub classification: Priority,
    pub key_phrases: Vec<String>,
    pub reasoning: String,
    pub recommended_action: RecommendedAction,
    pub breakdown: ScoreBreakdown,
    pub processed_at: DateTime<Utc>,
}
