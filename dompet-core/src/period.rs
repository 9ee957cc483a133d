//! Period labels: backend date parsing and locale-aware "day month year" output.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const ID_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];
const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display locale for dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "id-ID")]
    Indonesian,
    #[serde(rename = "en-GB")]
    English,
}

impl Locale {
    fn months(&self) -> &'static [&'static str; 12] {
        match self {
            Locale::Indonesian => &ID_MONTHS,
            Locale::English => &EN_MONTHS,
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "id-id" => Ok(Locale::Indonesian),
            "en" | "en-gb" | "en-us" => Ok(Locale::English),
            other => Err(anyhow!("unsupported locale: {other}")),
        }
    }
}

/// Parse an IANA time zone name like "Asia/Jakarta"
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| anyhow!("invalid timezone: {name}"))
}

/// Parse a date as the backend sends it.
///
/// Accepts a bare `YYYY-MM-DD`, an RFC 3339 timestamp or an RFC 2822 timestamp
/// (`Tue, 01 Oct 2024 00:00:00 GMT`). Timestamps are moved into `tz` before the
/// calendar date is taken.
pub fn parse_backend_date(raw: &str, tz: Tz) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&tz).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Ok(dt.with_timezone(&tz).date_naive());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ndt.date());
    }
    Err(anyhow!("unrecognized date '{raw}'"))
}

/// `2024-10-01` -> `"1 Okt 2024"` (Indonesian)
pub fn format_day(date: NaiveDate, locale: Locale) -> String {
    format!(
        "{} {} {}",
        date.day(),
        locale.months()[date.month0() as usize],
        date.year()
    )
}

pub fn period_label(start: NaiveDate, end: NaiveDate, locale: Locale) -> String {
    format!("{} - {}", format_day(start, locale), format_day(end, locale))
}
