//! Locale-flexible date parsing.
//!
//! Parsing never fails loudly: [`safe_parse`] returns `None` for anything it
//! cannot read and the caller substitutes a missing cell.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::data::{Cell, Column, ColumnKind};

const ISO_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y", "%m/%d/%y"];
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y"];
const NAMED_MONTH_FORMATS: &[&str] = &[
    "%d %B %Y", "%d %b %Y", "%B %d %Y", "%b %d %Y", "%d-%b-%Y", "%d-%B-%Y", "%Y %B %d",
];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Indonesian month names (and abbreviations that differ from English) mapped to English.
const INDONESIAN_MONTHS: &[(&str, &str)] = &[
    ("januari", "january"),
    ("februari", "february"),
    ("pebruari", "february"),
    ("maret", "march"),
    ("mei", "may"),
    ("juni", "june"),
    ("juli", "july"),
    ("agustus", "august"),
    ("agu", "aug"),
    ("agt", "aug"),
    ("oktober", "october"),
    ("okt", "oct"),
    ("desember", "december"),
    ("des", "dec"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DateOptions {
    pub day_first: bool,
}

fn translate_months(value: &str) -> String {
    value
        .to_lowercase()
        .replace(',', " ")
        .split_whitespace()
        .map(|word| {
            let stripped = word.trim_end_matches('.');
            INDONESIAN_MONTHS
                .iter()
                .find(|(id, _)| *id == stripped)
                .map(|(_, en)| en.to_string())
                .unwrap_or_else(|| stripped.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// chrono's `%Y` also reads one to three digit years; those belong to `%y`.
fn full_year(fmt: &str, date: NaiveDate) -> bool {
    !fmt.contains("%Y") || date.year() >= 1000
}

fn try_formats(value: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(value, fmt)
            .ok()
            .filter(|date| full_year(fmt, *date))
    })
}

/// Parses a date in any supported layout, or returns `None`.
pub fn safe_parse(value: &str, options: DateOptions) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = try_formats(trimmed, ISO_FORMATS) {
        return Some(date);
    }
    if let Some(date) = DATETIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(trimmed, fmt)
            .ok()
            .map(|datetime| datetime.date())
            .filter(|date| full_year(fmt, *date))
    }) {
        return Some(date);
    }
    let (first, second) = if options.day_first {
        (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS)
    } else {
        (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS)
    };
    if let Some(date) = try_formats(trimmed, first).or_else(|| try_formats(trimmed, second)) {
        return Some(date);
    }
    if trimmed.chars().any(char::is_alphabetic) {
        let translated = translate_months(trimmed);
        return try_formats(&translated, NAMED_MONTH_FORMATS);
    }
    None
}

/// Rewrites a date column in place. Returns the number of cells left missing.
///
/// A column already holding only dates is left untouched.
pub fn normalize_column(column: &mut Column, options: DateOptions) -> usize {
    if column.kind() != ColumnKind::Date {
        for cell in &mut column.cells {
            *cell = match cell {
                Cell::Text(raw) => safe_parse(raw, options).map_or(Cell::Missing, Cell::Date),
                Cell::Number(n) if n.fract() == 0.0 && *n >= 0.0 => {
                    safe_parse(&format!("{n:.0}"), options).map_or(Cell::Missing, Cell::Date)
                }
                Cell::Date(d) => Cell::Date(*d),
                _ => Cell::Missing,
            };
        }
    }
    column.missing_count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_and_datetime_inputs_parse() {
        let opts = DateOptions::default();
        assert_eq!(safe_parse("2024-05-06", opts), Some(ymd(2024, 5, 6)));
        assert_eq!(safe_parse("2024/05/06", opts), Some(ymd(2024, 5, 6)));
        assert_eq!(safe_parse("20240506", opts), Some(ymd(2024, 5, 6)));
        assert_eq!(safe_parse("2024-05-06T14:30:00", opts), Some(ymd(2024, 5, 6)));
    }

    #[test]
    fn ambiguous_dates_follow_day_first() {
        let month_first = DateOptions { day_first: false };
        let day_first = DateOptions { day_first: true };
        assert_eq!(safe_parse("05/06/2024", month_first), Some(ymd(2024, 5, 6)));
        assert_eq!(safe_parse("05/06/2024", day_first), Some(ymd(2024, 6, 5)));
        // 25 cannot be a month, so the other order is used.
        assert_eq!(safe_parse("25/12/2023", month_first), Some(ymd(2023, 12, 25)));
    }

    #[test]
    fn two_digit_years_are_not_read_as_ancient_dates() {
        let month_first = DateOptions { day_first: false };
        let day_first = DateOptions { day_first: true };
        assert_eq!(safe_parse("03/15/24", month_first), Some(ymd(2024, 3, 15)));
        assert_eq!(safe_parse("25/12/23", day_first), Some(ymd(2023, 12, 25)));
        assert_eq!(safe_parse("25/12/23", month_first), Some(ymd(2023, 12, 25)));
        assert_eq!(safe_parse("05/06/99", day_first), Some(ymd(1999, 6, 5)));
    }

    #[test]
    fn short_years_never_fill_four_digit_formats() {
        let opts = DateOptions::default();
        assert_eq!(safe_parse("24-03-15", opts), None);
        assert_eq!(safe_parse("0024-03-15", opts), None);
    }

    #[test]
    fn month_names_in_english_and_indonesian() {
        let opts = DateOptions::default();
        assert_eq!(safe_parse("17 Agustus 1945", opts), Some(ymd(1945, 8, 17)));
        assert_eq!(safe_parse("1 Januari 2020", opts), Some(ymd(2020, 1, 1)));
        assert_eq!(safe_parse("March 3, 2021", opts), Some(ymd(2021, 3, 3)));
        assert_eq!(safe_parse("12 Okt 2022", opts), Some(ymd(2022, 10, 12)));
    }

    #[test]
    fn malformed_dates_are_none() {
        let opts = DateOptions::default();
        for value in ["", "tomorrow", "2024-13-45", "31/31/2020", "not a date"] {
            assert_eq!(safe_parse(value, opts), None, "{value}");
        }
    }

    #[test]
    fn normalize_column_counts_missing() {
        let mut column = Column::new(
            "signup_date",
            vec![
                Cell::text("2024-01-02"),
                Cell::text("garbage"),
                Cell::Missing,
            ],
        );
        let missing = normalize_column(&mut column, DateOptions::default());
        assert_eq!(missing, 2);
        assert_eq!(column.cells[0], Cell::Date(ymd(2024, 1, 2)));
    }

    #[test]
    fn date_columns_are_left_untouched() {
        let mut column = Column::new("d", vec![Cell::Date(ymd(2020, 1, 1)), Cell::Missing]);
        let before = column.clone();
        assert_eq!(normalize_column(&mut column, DateOptions::default()), 1);
        assert_eq!(column, before);
    }
}
