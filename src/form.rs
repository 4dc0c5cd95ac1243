//! Field state records and the derived submit gate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::DateParsing;
use crate::schedule::LoanRequest;
use crate::types::{FieldId, LoanError};
use crate::validation::{
    DateInputs, DateVerdict, FieldVerdict, parse_number, validate_dates, validate_field,
};

/// Per-field validity marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Pristine,
    Valid,
    Invalid,
}

/// One tracked input: its raw text, validity marker and error slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: FieldId,
    pub value: String,
    pub state: FieldState,
    pub error: Option<String>,
}

impl FormField {
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            value: String::new(),
            state: FieldState::Pristine,
            error: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn mark(&mut self, verdict: &FieldVerdict) {
        match verdict {
            FieldVerdict::Valid => {
                self.state = FieldState::Valid;
                self.error = None;
            }
            FieldVerdict::Invalid(msg) => {
                self.state = FieldState::Invalid;
                self.error = Some((*msg).to_string());
            }
        }
    }

    fn clear(&mut self) {
        self.value.clear();
        self.state = FieldState::Pristine;
        self.error = None;
    }
}

/// Which fields the form tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormLayout {
    /// Start, end, first payment, amount and rate.
    #[default]
    Basic,
    /// The basic fields plus an optional installment count.
    WithInstallments,
}

impl FormLayout {
    pub fn basic() -> Self {
        FormLayout::Basic
    }

    pub fn with_installments() -> Self {
        FormLayout::WithInstallments
    }

    pub fn fields(&self) -> &'static [FieldId] {
        const BASIC: &[FieldId] = &[
            FieldId::StartDate,
            FieldId::EndDate,
            FieldId::FirstPaymentDate,
            FieldId::LoanAmount,
            FieldId::InterestRate,
        ];
        const WITH_INSTALLMENTS: &[FieldId] = &[
            FieldId::StartDate,
            FieldId::EndDate,
            FieldId::FirstPaymentDate,
            FieldId::LoanAmount,
            FieldId::InterestRate,
            FieldId::InstallmentCount,
        ];
        match self {
            FormLayout::Basic => BASIC,
            FormLayout::WithInstallments => WITH_INSTALLMENTS,
        }
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.fields().contains(&field)
    }
}

/// The set of tracked fields for one layout.
#[derive(Debug, Clone)]
pub struct Form {
    layout: FormLayout,
    parsing: DateParsing,
    fields: BTreeMap<FieldId, FormField>,
}

impl Form {
    pub fn new(layout: FormLayout, parsing: DateParsing) -> Self {
        let fields = layout
            .fields()
            .iter()
            .map(|id| (*id, FormField::new(*id)))
            .collect();
        Self {
            layout,
            parsing,
            fields,
        }
    }

    pub fn layout(&self) -> FormLayout {
        self.layout
    }

    pub fn field(&self, id: FieldId) -> Option<&FormField> {
        self.fields.get(&id)
    }

    /// Fields in layout order.
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.layout.fields().iter().filter_map(|id| self.fields.get(id))
    }

    pub fn value(&self, id: FieldId) -> &str {
        self.fields.get(&id).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Stores raw text; returns `false` for fields outside the layout.
    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>) -> bool {
        match self.fields.get_mut(&id) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    // ── evaluate ──────────────────────────────────────────────────

    pub fn evaluate_field(&self, id: FieldId) -> FieldVerdict {
        validate_field(id, self.value(id), self.parsing)
    }

    pub fn evaluate_dates(&self) -> DateVerdict {
        if !self.layout.contains(FieldId::StartDate) {
            return DateVerdict::default();
        }
        validate_dates(DateInputs::parse(
            self.value(FieldId::StartDate),
            self.value(FieldId::EndDate),
            self.value(FieldId::FirstPaymentDate),
            self.parsing,
        ))
    }

    // ── apply ─────────────────────────────────────────────────────

    pub fn apply_field(&mut self, id: FieldId, verdict: &FieldVerdict) {
        if let Some(field) = self.fields.get_mut(&id) {
            field.mark(verdict);
            debug!(field = %id, state = ?field.state, "field validated");
        }
    }

    /// Applies a date verdict. A slot whose own field-level verdict is
    /// invalid keeps that verdict.
    pub fn apply_dates(&mut self, verdict: &DateVerdict) {
        for id in [FieldId::EndDate, FieldId::FirstPaymentDate] {
            let Some(date_verdict) = verdict.for_field(id) else {
                continue;
            };
            let own = self.evaluate_field(id);
            let effective = if own.is_valid() { date_verdict } else { &own };
            if let Some(field) = self.fields.get_mut(&id) {
                field.mark(effective);
                debug!(field = %id, state = ?field.state, "date consistency applied");
            }
        }
    }

    /// Validates and applies every field plus the date check.
    /// Returns the fields left invalid.
    pub fn validate_all(&mut self) -> Vec<FieldId> {
        let ids: Vec<FieldId> = self.layout.fields().to_vec();
        for id in &ids {
            let verdict = self.evaluate_field(*id);
            self.apply_field(*id, &verdict);
        }
        let dates = self.evaluate_dates();
        self.apply_dates(&dates);

        self.fields()
            .filter(|f| f.state == FieldState::Invalid)
            .map(|f| f.id)
            .collect()
    }

    // ── gate ──────────────────────────────────────────────────────

    /// Whether the submit action is enabled. Pure and idempotent.
    pub fn submit_enabled(&self) -> bool {
        let all_filled = self
            .fields()
            .filter(|f| f.id.is_required())
            .all(|f| !f.is_blank());
        let none_invalid = self.fields().all(|f| f.state != FieldState::Invalid);
        all_filled && none_invalid && self.evaluate_dates().is_valid()
    }

    /// Clears every value, marker and error message.
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            field.clear();
        }
    }

    /// Builds the request payload from the current values.
    ///
    /// Callers are expected to have validated the form; anything that still
    /// fails to parse is reported as an invalid form.
    pub fn to_request(&self) -> Result<LoanRequest, LoanError> {
        let mut bad = Vec::new();

        let mut number = |id: FieldId| {
            let parsed = parse_number(self.value(id));
            if parsed.is_none() {
                bad.push(id);
            }
            parsed.unwrap_or_default()
        };
        let loan_amount = number(FieldId::LoanAmount);
        let interest_rate = number(FieldId::InterestRate);

        let installment_count = match self.field(FieldId::InstallmentCount) {
            Some(field) if !field.is_blank() => match field.value.trim().parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    bad.push(FieldId::InstallmentCount);
                    None
                }
            },
            _ => None,
        };

        if !bad.is_empty() {
            return Err(LoanError::InvalidForm { fields: bad });
        }

        Ok(LoanRequest {
            start_date: self.value(FieldId::StartDate).trim().to_string(),
            end_date: self.value(FieldId::EndDate).trim().to_string(),
            first_payment_date: self.value(FieldId::FirstPaymentDate).trim().to_string(),
            loan_amount,
            interest_rate,
            installment_count,
        })
    }
}
