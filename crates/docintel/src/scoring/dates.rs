use chrono::NaiveDate;
use regex::{Captures, Regex};

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateLayout {
    /// Month and day as numbers, e.g. `3/14/2025`.
    NumericMonthFirst,
    /// ISO-like ordering, e.g. `2025-3-14`.
    NumericYearFirst,
    /// Spelled-out month, e.g. `March 14, 2025`.
    MonthName,
}

/// One date shape the extractor scans for.
///
/// Every pattern exposes `year`, `month` and `day` capture groups; `month` is
/// either a number or an English month name depending on the layout.
#[derive(Debug, Clone)]
pub struct DatePattern {
    name: &'static str,
    regex: Regex,
    layout: DateLayout,
}

impl DatePattern {
    pub fn english_defaults() -> Result<Vec<Self>, regex::Error> {
        let month_alternation = MONTH_NAMES.join("|");

        Ok(vec![
            Self {
                name: "month/day/year",
                regex: Regex::new(
                    r"\b(?P<month>[0-9]{1,2})/(?P<day>[0-9]{1,2})/(?P<year>[0-9]{4})\b",
                )?,
                layout: DateLayout::NumericMonthFirst,
            },
            Self {
                name: "year-month-day",
                regex: Regex::new(
                    r"\b(?P<year>[0-9]{4})-(?P<month>[0-9]{1,2})-(?P<day>[0-9]{1,2})\b",
                )?,
                layout: DateLayout::NumericYearFirst,
            },
            Self {
                name: "month-name day, year",
                regex: Regex::new(&format!(
                    r"(?i)\b(?P<month>{month_alternation})\s+(?P<day>[0-9]{{1,2}}),?\s+(?P<year>[0-9]{{4}})\b"
                ))?,
                layout: DateLayout::MonthName,
            },
        ])
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, captures: &Captures<'_>) -> Option<NaiveDate> {
        let year: i32 = captures.name("year")?.as_str().parse().ok()?;
        let day: u32 = captures.name("day")?.as_str().parse().ok()?;
        let month_raw = captures.name("month")?.as_str();

        let month = match self.layout {
            DateLayout::NumericMonthFirst | DateLayout::NumericYearFirst => {
                month_raw.parse().ok()?
            }
            DateLayout::MonthName => month_from_name(month_raw)?,
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Scans free text for calendar dates using an ordered set of [`DatePattern`]s.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    patterns: Vec<DatePattern>,
}

impl DateExtractor {
    pub fn new(patterns: Vec<DatePattern>) -> Self {
        Self { patterns }
    }

    pub fn english() -> Result<Self, regex::Error> {
        Ok(Self::new(DatePattern::english_defaults()?))
    }

    pub fn patterns(&self) -> &[DatePattern] {
        &self.patterns
    }

    /// Every parsable date in `text`, pattern by pattern.
    ///
    /// Matches that fail calendar validation (`13/40/2024`) are dropped.
    pub fn extract(&self, text: &str) -> Vec<NaiveDate> {
        self.patterns
            .iter()
            .flat_map(|pattern| {
                pattern
                    .regex
                    .captures_iter(text)
                    .filter_map(move |captures| pattern.parse(&captures))
            })
            .collect()
    }
}

fn month_from_name(raw: &str) -> Option<u32> {
    let lowered = raw.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| *name == lowered)
        .map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DateExtractor {
        DateExtractor::english().expect("default patterns compile")
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn finds_each_supported_layout() {
        let text = "Filed 12/01/2024, heard 2025-1-5 and adopted January 20, 2025.";
        let dates = extractor().extract(text);

        assert_eq!(
            dates,
            vec![ymd(2024, 12, 1), ymd(2025, 1, 5), ymd(2025, 1, 20)]
        );
    }

    #[test]
    fn month_names_ignore_case_and_optional_comma() {
        let dates = extractor().extract("MARCH 3 2025 then april 9, 2025");
        assert_eq!(dates, vec![ymd(2025, 3, 3), ymd(2025, 4, 9)]);
    }

    #[test]
    fn impossible_dates_are_discarded() {
        let dates = extractor().extract("13/40/2024 and 2024-02-30 and February 31, 2024");
        assert!(dates.is_empty());
    }

    #[test]
    fn digits_embedded_in_longer_numbers_are_ignored() {
        let dates = extractor().extract("Permit 112/01/20245 and ref 12025-01-011");
        assert!(dates.is_empty());
    }

    #[test]
    fn default_patterns_are_named() {
        let names: Vec<_> = extractor().patterns().iter().map(DatePattern::name).collect();
        assert_eq!(
            names,
            vec!["month/day/year", "year-month-day", "month-name day, year"]
        );
    }
}
