use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Identifies one tracked input of the loan form.
///
/// The declaration order is the on-screen order; layouts pick a subset of it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FieldId {
    StartDate,
    EndDate,
    FirstPaymentDate,
    LoanAmount,
    InterestRate,
    InstallmentCount,
}

impl FieldId {
    /// Semantic role used by the field validator.
    pub fn role(&self) -> FieldRole {
        match self {
            FieldId::StartDate | FieldId::EndDate | FieldId::FirstPaymentDate => FieldRole::Date,
            FieldId::LoanAmount => FieldRole::Amount,
            FieldId::InterestRate => FieldRole::Rate,
            FieldId::InstallmentCount => FieldRole::Count,
        }
    }

    /// Human-readable label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::StartDate => "Start date",
            FieldId::EndDate => "End date",
            FieldId::FirstPaymentDate => "First payment",
            FieldId::LoanAmount => "Loan amount",
            FieldId::InterestRate => "Interest rate",
            FieldId::InstallmentCount => "Installments",
        }
    }

    /// Placeholder hint for an empty input.
    pub fn hint(&self) -> &'static str {
        match self.role() {
            FieldRole::Date => "YYYY-MM-DD",
            FieldRole::Amount => "R$",
            FieldRole::Rate => "% per month",
            FieldRole::Count => "optional",
        }
    }

    /// Whether an empty value blocks submission.
    pub fn is_required(&self) -> bool {
        !matches!(self, FieldId::InstallmentCount)
    }

    pub fn is_date(&self) -> bool {
        self.role() == FieldRole::Date
    }
}

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Date,
    Amount,
    Rate,
    Count,
}

/// User-facing validation and feedback messages.
pub mod messages {
    pub const REQUIRED: &str = "This field is required";
    pub const GREATER_THAN_ZERO: &str = "Value must be greater than zero";
    pub const NOT_A_NUMBER: &str = "Enter a valid number";
    pub const NOT_A_WHOLE_NUMBER: &str = "Enter a whole number";
    pub const NOT_A_DATE: &str = "Enter a date as YYYY-MM-DD";
    pub const END_BEFORE_START: &str = "End date must be after start date";
    pub const FIRST_PAYMENT_OUT_OF_RANGE: &str =
        "First payment date must fall between start and end dates";

    pub const CALCULATION_SUCCEEDED: &str = "Calculation completed successfully!";
    pub const CALCULATION_FAILED: &str = "Calculation error";
    pub const CONNECTION_FAILED: &str = "Connection error. Check that the server is running.";
    pub const INVALID_DATE: &str = "Invalid date";
}

/// Errors surfaced by the controller and its configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanError {
    #[error("form has invalid fields: {}", join_fields(.fields))]
    InvalidForm { fields: Vec<FieldId> },

    #[error("a calculation request is already in flight")]
    RequestInFlight,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("formatting error: {0}")]
    Formatting(String),

    #[error("invalid calendar date '{0}'")]
    InvalidDate(String),
}

fn join_fields(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
