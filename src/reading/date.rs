//! Best-effort extraction of a calendar date from free text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried against the whole text, in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date layouts tried against the whole text and then against single tokens.
/// Month-first slash dates come before day-first ones, here and in
/// `DATETIME_FORMATS`.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
];

/// Only tried against the whole text; inside free text an 8-digit run is
/// more often an id than a date.
const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Returns the date embedded in `text`, or `None` if nothing recognisable is there.
pub fn parse_description(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .map(|dt| dt.date())
        .or_else(|| parse_date(text))
        .or_else(|| NaiveDate::parse_from_str(text, COMPACT_DATE_FORMAT).ok())
        .or_else(|| scan_tokens(text))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
}

/// Looks for the first token that is a date on its own, e.g. in "Level on 2022-06-15 (pre-monsoon)".
fn scan_tokens(text: &str) -> Option<NaiveDate> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '(' | ')' | '|'))
        .filter(|token| token.len() >= 6)
        .find_map(|token| {
            let token = token.split('T').next().unwrap_or(token);
            parse_date(token)
        })
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn should_parse_iso_forms() {
        assert_eq!(parse_description("2022-06-15"), date(2022, 6, 15));
        assert_eq!(parse_description(" 2022-06-15 10:30:00 "), date(2022, 6, 15));
        assert_eq!(parse_description("2022-06-15T10:30:00.123"), date(2022, 6, 15));
        assert_eq!(parse_description("2022-06-15T10:30:00+05:30"), date(2022, 6, 15));
    }

    #[test]
    fn should_prefer_month_first_for_slashes() {
        assert_eq!(parse_description("06/05/2022"), date(2022, 6, 5));
        assert_eq!(parse_description("15/06/2022"), date(2022, 6, 15));
    }

    #[test]
    fn should_read_slash_dates_the_same_with_or_without_time() {
        assert_eq!(parse_description("06/05/2022 10:00:00"), parse_description("06/05/2022"));
        assert_eq!(parse_description("06/05/2022 10:00"), date(2022, 6, 5));
        assert_eq!(parse_description("15/06/2022 10:00:00"), date(2022, 6, 15));
    }

    #[test]
    fn should_parse_named_months() {
        assert_eq!(parse_description("15-Jun-2022"), date(2022, 6, 15));
        assert_eq!(parse_description("June 15, 2022"), date(2022, 6, 15));
        assert_eq!(parse_description("15 June 2022"), date(2022, 6, 15));
    }

    #[test]
    fn should_find_embedded_token() {
        assert_eq!(
            parse_description("Water level recorded on 15-06-2022 (pre-monsoon)"),
            date(2022, 6, 15)
        );
        assert_eq!(parse_description("obs 2021-03-02T06:00:00"), date(2021, 3, 2));
    }

    #[test]
    fn should_read_compact_date_only_as_whole_text() {
        assert_eq!(parse_description("20220615"), date(2022, 6, 15));
        assert_eq!(parse_description("well 20210101 read on 15-06-2022"), date(2022, 6, 15));
        assert_eq!(parse_description("well 20210101"), None);
    }

    #[test]
    fn should_give_none_for_noise() {
        assert_eq!(parse_description(""), None);
        assert_eq!(parse_description("not a date"), None);
        assert_eq!(parse_description("2022-13-45"), None);
    }
}
