use crate::scoring::{KeywordTier, ScoringConfig};
use std::fmt::Write as _;

/// Plain-text explanation of how documents are scored under `config`.
pub fn render_methodology(config: &ScoringConfig) -> String {
    let mut text = String::new();
    let keywords = &config.keywords;
    let modifiers = &config.modifiers;
    let thresholds = &config.thresholds;

    writeln!(text, "Cannabis Document Classification Methodology").expect("write title");
    writeln!(text, "===========================================").expect("write title rule");
    writeln!(
        text,
        "\nDocuments are scored with weighted keyword tiers and context modifiers.\n\
         Matching is a case-insensitive substring search and each phrase counts once."
    )
    .expect("write overview");

    writeln!(text, "\nKeyword Tiers:").expect("write tier heading");
    write_tier(&mut text, "1. HIGH VALUE", &keywords.high);
    write_tier(&mut text, "2. MEDIUM VALUE", &keywords.medium);
    write_tier(&mut text, "3. LOW VALUE", &keywords.low);

    writeln!(text, "\nContext Modifiers:").expect("write modifier heading");
    writeln!(
        text,
        "1. POSITIVE (+{} points each): {}",
        modifiers.points,
        quoted(&modifiers.positive)
    )
    .expect("write positive modifiers");
    writeln!(
        text,
        "2. NEGATIVE (-{} points each): {}",
        modifiers.points,
        quoted(&modifiers.negative)
    )
    .expect("write negative modifiers");
    writeln!(
        text,
        "3. DATE BONUS (+{} points per date within {} days)",
        config.date_bonus.points, config.date_bonus.window_days
    )
    .expect("write date bonus");
    writeln!(
        text,
        "4. HEADING BONUS (+{} points once for the first {} lines, +{} once for the document name)",
        config.heading_bonus.points, config.heading_bonus.max_lines, config.heading_bonus.points
    )
    .expect("write heading bonus");

    writeln!(text, "\nClassification Thresholds:").expect("write threshold heading");
    writeln!(
        text,
        "- {}+ points: HIGH PRIORITY (immediate action needed)",
        thresholds.high
    )
    .expect("write high threshold");
    writeln!(
        text,
        "- {}-{} points: MEDIUM PRIORITY (monitor and plan)",
        thresholds.medium,
        thresholds.high - 1
    )
    .expect("write medium threshold");
    writeln!(
        text,
        "- {}-{} points: LOW PRIORITY (background awareness)",
        thresholds.low,
        thresholds.medium - 1
    )
    .expect("write low threshold");
    writeln!(text, "- Under {} points: IRRELEVANT (ignore)", thresholds.low)
        .expect("write irrelevant threshold");

    writeln!(
        text,
        "\nAutomation Workflows:\n\
         1. HIGH PRIORITY: immediate alert per document\n\
         2. MEDIUM PRIORITY: weekly digest e-mail\n\
         3. LOW PRIORITY: JSON automation log\n\
         4. IRRELEVANT: no action taken"
    )
    .expect("write workflows");

    text
}

fn write_tier(text: &mut String, heading: &str, tier: &KeywordTier) {
    writeln!(
        text,
        "{heading} ({} points each): {}",
        tier.points,
        quoted(&tier.phrases)
    )
    .expect("write keyword tier");
}

fn quoted(phrases: &[String]) -> String {
    phrases
        .iter()
        .map(|phrase| format!("\"{phrase}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
