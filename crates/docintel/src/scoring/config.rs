use super::ScoringError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for every point value and for `date_bonus.window_days`.
pub const MAX_WEIGHT: i64 = 1_000_000;

/// Keyword tiers, modifiers, thresholds and bonus weights used by the engine.
///
/// The value is fixed once handed to [`super::ScoringEngine::new`]; callers that
/// need different tables build a new engine instead of mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub keywords: KeywordTable,
    pub modifiers: ModifierTable,
    pub thresholds: Thresholds,
    #[serde(default)]
    pub date_bonus: DateBonus,
    #[serde(default)]
    pub heading_bonus: HeadingBonus,
}

impl ScoringConfig {
    pub fn standard() -> Self {
        Self {
            keywords: KeywordTable {
                high: KeywordTier::new(
                    10,
                    &[
                        "cannabis retail",
                        "dispensary license",
                        "application window",
                        "ordinance approved",
                        "licensing program",
                        "application period",
                        "merit-based selection",
                        "conditional use permit approved",
                        "second reading",
                    ],
                ),
                medium: KeywordTier::new(
                    5,
                    &[
                        "public hearing",
                        "planning commission",
                        "draft ordinance",
                        "zoning amendment",
                        "social equity",
                        "moratorium lifted",
                        "cannabis business",
                        "study session",
                    ],
                ),
                low: KeywordTier::new(
                    2,
                    &[
                        "cannabis",
                        "marijuana",
                        "dispensary",
                        "retail",
                        "tax revenue",
                        "budget discussion",
                        "general mention",
                    ],
                ),
            },
            modifiers: ModifierTable {
                points: 3,
                positive: to_phrases(&["approved", "passed", "effective", "final"]),
                negative: to_phrases(&["prohibited", "banned", "rejected"]),
            },
            thresholds: Thresholds::default(),
            date_bonus: DateBonus::default(),
            heading_bonus: HeadingBonus::default(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ScoringError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScoringError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Rejects tables the engine cannot apply consistently.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let Thresholds { high, medium, low } = self.thresholds;
        if !(high > medium && medium > low) {
            return Err(ScoringError::InvalidThresholds { high, medium, low });
        }

        let weights = [
            ("keywords.high.points", i64::from(self.keywords.high.points)),
            ("keywords.medium.points", i64::from(self.keywords.medium.points)),
            ("keywords.low.points", i64::from(self.keywords.low.points)),
            ("modifiers.points", i64::from(self.modifiers.points)),
            ("date_bonus.points", i64::from(self.date_bonus.points)),
            ("heading_bonus.points", i64::from(self.heading_bonus.points)),
            ("date_bonus.window_days", self.date_bonus.window_days),
        ];
        for (field, value) in weights {
            if value < 0 {
                return Err(ScoringError::NegativeWeight { field, value });
            }
            if value > MAX_WEIGHT {
                return Err(ScoringError::WeightTooLarge {
                    field,
                    value,
                    max: MAX_WEIGHT,
                });
            }
        }

        let tables = [
            ("keywords.high", &self.keywords.high.phrases),
            ("keywords.medium", &self.keywords.medium.phrases),
            ("keywords.low", &self.keywords.low.phrases),
            ("modifiers.positive", &self.modifiers.positive),
            ("modifiers.negative", &self.modifiers.negative),
        ];
        for (table, phrases) in tables {
            if phrases.iter().any(|phrase| phrase.trim().is_empty()) {
                return Err(ScoringError::EmptyPhrase { table });
            }
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub high: KeywordTier,
    pub medium: KeywordTier,
    pub low: KeywordTier,
}

impl KeywordTable {
    /// Tiers in scoring order.
    pub fn tiers(&self) -> [(Tier, &KeywordTier); 3] {
        [
            (Tier::High, &self.high),
            (Tier::Medium, &self.medium),
            (Tier::Low, &self.low),
        ]
    }

    /// Phrases eligible for the heading and document-name bonus (high then medium).
    pub fn heading_phrases(&self) -> impl Iterator<Item = &str> {
        self.high
            .phrases
            .iter()
            .chain(self.medium.phrases.iter())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTier {
    pub points: i32,
    pub phrases: Vec<String>,
}

impl KeywordTier {
    pub fn new(points: i32, phrases: &[&str]) -> Self {
        Self {
            points,
            phrases: to_phrases(phrases),
        }
    }
}

/// Flat adjustments applied once per matched phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierTable {
    pub points: i32,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high: i32,
    pub medium: i32,
    pub low: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 70,
            medium: 30,
            low: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBonus {
    pub window_days: i64,
    pub points: i32,
}

impl Default for DateBonus {
    fn default() -> Self {
        Self {
            window_days: 90,
            points: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingBonus {
    pub max_lines: usize,
    pub max_line_chars: usize,
    pub points: i32,
}

impl Default for HeadingBonus {
    fn default() -> Self {
        Self {
            max_lines: 10,
            max_line_chars: 100,
            points: 2,
        }
    }
}

fn to_phrases(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|phrase| phrase.to_string()).collect()
}
