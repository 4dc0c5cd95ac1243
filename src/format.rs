//! pt-BR display formatting for the schedule table.

use std::str::FromStr;

use fixed_decimal::FixedDecimal;
use icu::decimal::FixedDecimalFormatter;
use icu::decimal::options::FixedDecimalFormatterOptions;
use icu::locid::Locale;
use rust_decimal::{Decimal, RoundingStrategy};
use writeable::Writeable;

use crate::dates::format_competence_date;
use crate::schedule::ScheduleRow;
use crate::types::LoanError;

/// Locale used for every number and date on screen.
pub const DISPLAY_LOCALE: &str = "pt-BR";

/// Rendered text for a missing or zero amount.
pub const ZERO_CURRENCY: &str = "R$ 0,00";

/// Column headers of the schedule table, in render order.
pub const SCHEDULE_COLUMNS: [&str; 10] = [
    "Competence",
    "Loan amount",
    "Outstanding balance",
    "Consolidated",
    "Total",
    "Amortization",
    "Balance",
    "Provision",
    "Accrued interest",
    "Paid",
];

/// Trait for formatting usage.
pub trait CurrencyFormatter {
    fn format_currency(&self, amount: Option<Decimal>) -> String;
}

/// Brazilian real formatting backed by ICU4X compiled data.
pub struct BrlFormatter {
    formatter: FixedDecimalFormatter,
}

impl std::fmt::Debug for BrlFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrlFormatter")
            .field("locale", &DISPLAY_LOCALE)
            .finish()
    }
}

impl BrlFormatter {
    pub fn new() -> Result<Self, LoanError> {
        let locale: Locale = DISPLAY_LOCALE
            .parse()
            .map_err(|e| LoanError::Formatting(format!("bad locale {DISPLAY_LOCALE}: {e}")))?;
        let formatter = FixedDecimalFormatter::try_new(
            &locale.into(),
            FixedDecimalFormatterOptions::default(),
        )
        .map_err(|e| LoanError::Formatting(format!("no decimal data for {DISPLAY_LOCALE}: {e}")))?;
        Ok(Self { formatter })
    }

    /// Formats `1234.5` as `1.234,50`: two fraction digits, half away from zero.
    pub fn format_number(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let mut fixed = FixedDecimal::from_str(&rounded.to_string())
            .unwrap_or_else(|_| FixedDecimal::from(0));
        fixed.pad_end(-2);
        self.formatter.format(&fixed).write_to_string().into_owned()
    }
}

impl CurrencyFormatter for BrlFormatter {
    fn format_currency(&self, amount: Option<Decimal>) -> String {
        let amount = match amount {
            Some(a) if !a.is_zero() => a,
            _ => return ZERO_CURRENCY.to_string(),
        };
        // Rounds to zero cents, e.g. 0.001.
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            return ZERO_CURRENCY.to_string();
        }
        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        format!("{sign}R$ {}", self.format_number(rounded.abs()))
    }
}

/// A schedule row turned into display text, one cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub cells: [String; 10],
}

impl RenderedRow {
    pub fn competence(&self) -> &str {
        &self.cells[0]
    }
}

/// Renders rows in the fixed column order of [`SCHEDULE_COLUMNS`].
pub fn render_rows(rows: &[ScheduleRow], currency: &impl CurrencyFormatter) -> Vec<RenderedRow> {
    rows.iter()
        .map(|row| RenderedRow {
            cells: [
                format_competence_date(row.competence_date.as_ref()),
                currency.format_currency(row.loan_amount),
                currency.format_currency(row.outstanding_balance),
                row.consolidated_text(),
                currency.format_currency(row.total),
                currency.format_currency(row.amortization),
                currency.format_currency(row.balance),
                currency.format_currency(row.provision),
                currency.format_currency(row.accrued_interest),
                currency.format_currency(row.paid),
            ],
        })
        .collect()
}
