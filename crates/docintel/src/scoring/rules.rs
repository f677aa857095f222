use super::config::{DateBonus, HeadingBonus, KeywordTable, ModifierTable, ScoringConfig};
use super::dates::DateExtractor;
use super::domain::ScoreBreakdown;
use chrono::NaiveDate;

pub(crate) struct ScoreSignals {
    pub key_phrases: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

pub(crate) fn score_document(
    text: &str,
    document_name: &str,
    config: &ScoringConfig,
    dates: &DateExtractor,
    today: NaiveDate,
) -> ScoreSignals {
    let normalized = text.to_lowercase();

    let (keywords, key_phrases) = keyword_points(&normalized, &config.keywords);
    let modifiers = modifier_points(&normalized, &config.modifiers);
    let dates = date_points(text, dates, today, &config.date_bonus);
    let headings = heading_points(text, document_name, &config.keywords, &config.heading_bonus);

    ScoreSignals {
        key_phrases,
        breakdown: ScoreBreakdown {
            keywords,
            modifiers,
            dates,
            headings,
        },
    }
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&phrase.to_lowercase())
}

/// Tiers are scanned independently; a phrase nested inside a longer phrase from
/// another tier is counted in both.
fn keyword_points(normalized: &str, table: &KeywordTable) -> (i32, Vec<String>) {
    let mut points: i32 = 0;
    let mut key_phrases = Vec::new();

    for (_, tier) in table.tiers() {
        for phrase in &tier.phrases {
            if contains_phrase(normalized, phrase) {
                points = points.saturating_add(tier.points);
                key_phrases.push(phrase.clone());
            }
        }
    }

    (points, key_phrases)
}

fn modifier_points(normalized: &str, table: &ModifierTable) -> i32 {
    let matches = |phrases: &[String]| {
        let count = phrases
            .iter()
            .filter(|phrase| contains_phrase(normalized, phrase))
            .count();
        i32::try_from(count).unwrap_or(i32::MAX)
    };

    matches(&table.positive[..])
        .saturating_sub(matches(&table.negative[..]))
        .saturating_mul(table.points)
}

fn date_points(text: &str, dates: &DateExtractor, today: NaiveDate, bonus: &DateBonus) -> i32 {
    let qualifying = dates
        .extract(text)
        .into_iter()
        .filter(|date| (*date - today).num_days().abs() <= bonus.window_days)
        .count();

    i32::try_from(qualifying)
        .unwrap_or(i32::MAX)
        .saturating_mul(bonus.points)
}

/// At most one award from the leading lines (first qualifying line wins) plus at
/// most one from the document name.
fn heading_points(
    text: &str,
    document_name: &str,
    table: &KeywordTable,
    bonus: &HeadingBonus,
) -> i32 {
    let mut points = 0;

    let heading_hit = text
        .split('\n')
        .take(bonus.max_lines)
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.chars().count() < bonus.max_line_chars)
        .any(|line| {
            let lowered = line.to_lowercase();
            table
                .heading_phrases()
                .any(|phrase| contains_phrase(&lowered, phrase))
        });
    if heading_hit {
        points = bonus.points;
    }

    let name = document_name.to_lowercase();
    if table
        .heading_phrases()
        .any(|phrase| contains_phrase(&name, phrase))
    {
        points = points.saturating_add(bonus.points);
    }

    points
}
