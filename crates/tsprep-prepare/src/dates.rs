//! Date parsing and calendar labels.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Weekday};
use tsprep_common::{Result, TsPrepError, Value};

/// Bare sale date form, e.g. `Tue, 04 Jan 2022`.
pub const SALE_DATE_FORMAT: &str = "%a, %d %b %Y";

/// Length of the ` HH:MM:SS ZZZ` tail that follows a bare sale date.
const SALE_TIME_SUFFIX_LEN: usize = 13;

const CALENDAR_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const CALENDAR_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn text<'a>(value: &'a Value) -> Result<&'a str> {
    match value {
        Value::Text(s) => Ok(s.trim()),
        other => Err(TsPrepError::date_parse(
            other.to_string(),
            format!("expected text, got {}", other.kind()),
        )),
    }
}

/// Parses a sale date such as `Tue, 04 Jan 2022 00:00:00 GMT`.
///
/// Accepts full RFC 2822 timestamps and the bare [`SALE_DATE_FORMAT`] date.
/// Anything else has its trailing 13 characters (a ` HH:MM:SS ZZZ` time
/// and zone) dropped and the remainder read as a bare date, so unknown zone
/// names are accepted. The calendar date is taken as written, without
/// shifting to UTC. A weekday name is required but need not agree with the
/// date.
pub fn parse_sale_date(value: &Value) -> Result<NaiveDate> {
    if let Value::Date(d) = value {
        return Ok(*d);
    }
    let s = text(value)?;

    if let Ok(timestamp) = DateTime::parse_from_rfc2822(s) {
        return Ok(timestamp.date_naive());
    }
    if let Some(date) = parse_bare_sale_date(s) {
        return Ok(date);
    }

    let Some((cut, _)) = s.char_indices().rev().nth(SALE_TIME_SUFFIX_LEN - 1) else {
        return Err(TsPrepError::date_parse(
            s,
            format!("shorter than {SALE_TIME_SUFFIX_LEN} characters"),
        ));
    };
    let day = s[..cut].trim_end();
    parse_bare_sale_date(day).ok_or_else(|| {
        TsPrepError::date_parse(s, format!("'{day}' does not match {SALE_DATE_FORMAT}"))
    })
}

/// `%a, %d %b %Y`, with the weekday checked only for being a weekday name.
fn parse_bare_sale_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, SALE_DATE_FORMAT) {
        return Some(date);
    }
    let (weekday, rest) = s.split_once(',')?;
    weekday.trim().parse::<Weekday>().ok()?;
    NaiveDate::parse_from_str(rest.trim(), "%d %b %Y").ok()
}

/// Parses an ISO-like calendar date or timestamp, keeping its date part.
pub fn parse_calendar_date(value: &Value) -> Result<NaiveDate> {
    if let Value::Date(d) = value {
        return Ok(*d);
    }
    let s = text(value)?;

    if let Some(date) = CALENDAR_DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    {
        return Ok(date);
    }
    if let Some(timestamp) = CALENDAR_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Ok(timestamp.date());
    }
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .map(|timestamp| timestamp.date_naive())
        .map_err(|e| TsPrepError::date_parse(s, e.to_string()))
}

/// Zero-padded month number and abbreviated name, e.g. `01-Jan`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%m-%b").to_string()
}

/// Weekday number counted from Sunday = 0 and abbreviated name, e.g. `2-Tue`.
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%w-%a").to_string()
}
