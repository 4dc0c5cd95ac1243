//! Calendar-date parsing and formatting.
//!
//! Dates are never routed through an instant or timezone-aware parser: the
//! text is split into integer year, month and day components first, and a
//! [`NaiveDate`] is built from those. `2024-03-01` is therefore always the
//! first of March, whatever the local UTC offset.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{LoanError, messages};

/// How strictly date text is decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateParsing {
    /// Exactly `YYYY-MM-DD`, surrounding whitespace ignored.
    #[default]
    Strict,
    /// The leading `YYYY-MM-DD` of an ISO-like string; a `T...` or space
    /// separated time and offset suffix is ignored.
    IsoPrefix,
}

impl DateParsing {
    pub fn parse(&self, text: &str) -> Result<NaiveDate, LoanError> {
        let trimmed = text.trim();
        let date_part = match self {
            DateParsing::Strict => trimmed,
            DateParsing::IsoPrefix => trimmed
                .split(|c| c == 'T' || c == 't' || c == ' ')
                .next()
                .unwrap_or(trimmed),
        };
        decompose(date_part).ok_or_else(|| LoanError::InvalidDate(text.to_string()))
    }
}

/// Parses a form date (`YYYY-MM-DD`) from its calendar components.
pub fn parse_calendar_date(text: &str) -> Result<NaiveDate, LoanError> {
    DateParsing::Strict.parse(text)
}

fn decompose(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if year.len() != 4 || month.is_empty() || month.len() > 2 || day.is_empty() || day.len() > 2 {
        return None;
    }
    if ![year, month, day]
        .iter()
        .all(|p| p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// A competence date as delivered by the server: either a `[year, month, day]`
/// triplet or an ISO-like string, depending on the server version.
///
/// Any other JSON shape is kept as [`CompetenceDate::Other`] so a single odd
/// row never rejects the whole response; it renders as the invalid-date marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompetenceDate {
    Triplet(i32, u32, u32),
    Text(String),
    Other(serde_json::Value),
}

impl CompetenceDate {
    pub fn from_date(date: NaiveDate) -> Self {
        CompetenceDate::Triplet(date.year(), date.month(), date.day())
    }

    /// Resolves to a calendar date; `None` when the payload is not a real date.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            CompetenceDate::Triplet(y, m, d) => NaiveDate::from_ymd_opt(*y, *m, *d),
            CompetenceDate::Text(text) => DateParsing::IsoPrefix.parse(text).ok(),
            CompetenceDate::Other(_) => None,
        }
    }
}

/// Formats a date the Brazilian way, `dd/mm/yyyy`.
pub fn format_br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Formats an optional competence date, falling back to a fixed marker.
pub fn format_competence_date(date: Option<&CompetenceDate>) -> String {
    date.and_then(CompetenceDate::to_date)
        .map(format_br_date)
        .unwrap_or_else(|| messages::INVALID_DATE.to_string())
}
