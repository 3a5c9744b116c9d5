// Posting-date inference.
//
// Listings show relative ages ("5 days ago"). Combined with the scrape
// timestamp that gives an absolute date. Anything that doesn't fit the
// pattern falls back to the scrape date unchanged.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve a relative "N days ago" string against the scrape date.
///
/// Returns `YYYY-MM-DD` on success, or `date_scraped` untouched when either
/// input can't be parsed.
pub fn convert_date_posted(date_posted: &str, date_scraped: &str) -> String {
    let resolved = parse_days_ago(date_posted).and_then(|days| {
        let scraped = parse_scrape_date(date_scraped)?;
        scraped.checked_sub_days(Days::new(days))
    });

    match resolved {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => date_scraped.to_string(),
    }
}

/// Parse "<integer> day(s) ago" into a day count.
fn parse_days_ago(text: &str) -> Option<u64> {
    let lower = text.trim().to_lowercase();
    let mut parts = lower.split_whitespace();
    let days = parts.next()?.parse::<u64>().ok()?;
    match (parts.next(), parts.next(), parts.next()) {
        (Some("day" | "days"), Some("ago"), None) => Some(days),
        _ => None,
    }
}

/// Accept a plain date or any common datetime form of the scrape timestamp.
fn parse_scrape_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}
