//! Field and cross-field validation.
//!
//! Everything here is pure: validators return verdicts and never touch the
//! form. [`crate::form::Form`] applies the verdicts afterwards.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::dates::DateParsing;
use crate::types::{FieldId, FieldRole, messages};

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldVerdict {
    Valid,
    Invalid(&'static str),
}

impl FieldVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldVerdict::Valid)
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            FieldVerdict::Valid => None,
            FieldVerdict::Invalid(msg) => Some(msg),
        }
    }
}

/// Validates one field value according to its role.
///
/// Priority: required, then format, then the greater-than-zero rule.
pub fn validate_field(field: FieldId, value: &str, parsing: DateParsing) -> FieldVerdict {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return if field.is_required() {
            FieldVerdict::Invalid(messages::REQUIRED)
        } else {
            FieldVerdict::Valid
        };
    }

    match field.role() {
        FieldRole::Date => match parsing.parse(trimmed) {
            Ok(_) => FieldVerdict::Valid,
            Err(_) => FieldVerdict::Invalid(messages::NOT_A_DATE),
        },
        FieldRole::Amount | FieldRole::Rate => match parse_number(trimmed) {
            Some(n) if n <= Decimal::ZERO => FieldVerdict::Invalid(messages::GREATER_THAN_ZERO),
            Some(_) => FieldVerdict::Valid,
            None => FieldVerdict::Invalid(messages::NOT_A_NUMBER),
        },
        FieldRole::Count => match trimmed.parse::<i64>() {
            Ok(n) if n <= 0 => FieldVerdict::Invalid(messages::GREATER_THAN_ZERO),
            Ok(n) if u32::try_from(n).is_err() => FieldVerdict::Invalid(messages::NOT_A_WHOLE_NUMBER),
            Ok(_) => FieldVerdict::Valid,
            Err(_) => FieldVerdict::Invalid(messages::NOT_A_WHOLE_NUMBER),
        },
    }
}

/// Parses a decimal number typed into an amount or rate input.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Verdicts for the two date slots touched by the consistency check.
///
/// `None` means the slot is left as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateVerdict {
    pub end_date: Option<FieldVerdict>,
    pub first_payment_date: Option<FieldVerdict>,
}

impl DateVerdict {
    pub fn is_valid(&self) -> bool {
        [&self.end_date, &self.first_payment_date]
            .into_iter()
            .flatten()
            .all(FieldVerdict::is_valid)
    }

    pub fn for_field(&self, field: FieldId) -> Option<&FieldVerdict> {
        match field {
            FieldId::EndDate => self.end_date.as_ref(),
            FieldId::FirstPaymentDate => self.first_payment_date.as_ref(),
            _ => None,
        }
    }
}

/// Dates as read from the form; a field counts as present once it parses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateInputs {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub first_payment: Option<NaiveDate>,
}

impl DateInputs {
    pub fn parse(start: &str, end: &str, first_payment: &str, parsing: DateParsing) -> Self {
        Self {
            start: parsing.parse(start).ok(),
            end: parsing.parse(end).ok(),
            first_payment: parsing.parse(first_payment).ok(),
        }
    }
}

/// Cross-field date ordering: `start < end` and `start < first_payment <= end`.
pub fn validate_dates(dates: DateInputs) -> DateVerdict {
    let end_date = match (dates.start, dates.end) {
        (Some(start), Some(end)) if end <= start => {
            Some(FieldVerdict::Invalid(messages::END_BEFORE_START))
        }
        (_, Some(_)) => Some(FieldVerdict::Valid),
        (_, None) => None,
    };

    let first_payment_date = match (dates.start, dates.end, dates.first_payment) {
        (Some(start), Some(end), Some(first)) => {
            if first <= start || first > end {
                Some(FieldVerdict::Invalid(messages::FIRST_PAYMENT_OUT_OF_RANGE))
            } else {
                Some(FieldVerdict::Valid)
            }
        }
        _ => None,
    };

    DateVerdict {
        end_date,
        first_payment_date,
    }
}
