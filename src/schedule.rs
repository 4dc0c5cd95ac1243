//! Wire types exchanged with the calculation server.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::dates::CompetenceDate;
use crate::types::messages;

/// Field naming used on the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WireFormat {
    /// `startDate`, `endDate`, `firstPaymentDate`, ...
    #[default]
    Standard,
    /// `dataInicial`, `dataFinal`, `primeiroPagamento`, ...
    Legacy,
}

/// The calculation request, built fresh on every submit.
///
/// Dates are forwarded as the calendar text the user typed; the server
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub start_date: String,
    pub end_date: String,
    pub first_payment_date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub loan_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_count: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyLoanRequest<'a> {
    data_inicial: &'a str,
    data_final: &'a str,
    primeiro_pagamento: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    valor_emprestimo: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    taxa_juros: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantidade_parcelas: Option<u32>,
}

impl LoanRequest {
    /// JSON body for the given wire format.
    pub fn to_json(&self, format: WireFormat) -> Value {
        let encoded = match format {
            WireFormat::Standard => serde_json::to_value(self),
            WireFormat::Legacy => serde_json::to_value(LegacyLoanRequest {
                data_inicial: &self.start_date,
                data_final: &self.end_date,
                primeiro_pagamento: &self.first_payment_date,
                valor_emprestimo: self.loan_amount,
                taxa_juros: self.interest_rate,
                quantidade_parcelas: self.installment_count,
            }),
        };
        // Plain strings and finite floats always encode.
        encoded.unwrap_or(Value::Null)
    }
}

/// Reads a money cell. Values a [`Decimal`] cannot hold (out of range,
/// non-numeric) become `None` instead of rejecting the whole response.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let text = match &raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => String::new(),
    };
    let parsed = Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text));
    match parsed {
        Ok(amount) => Ok(Some(amount)),
        Err(e) => {
            warn!(value = ?raw, error = %e, "unrepresentable amount in schedule row");
            Ok(None)
        }
    }
}

/// One line of the amortization schedule. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    #[serde(default, alias = "dataCompetencia")]
    pub competence_date: Option<CompetenceDate>,
    #[serde(default, alias = "valorEmprestimo", deserialize_with = "lenient_amount")]
    pub loan_amount: Option<Decimal>,
    #[serde(default, alias = "saldoDevedor", deserialize_with = "lenient_amount")]
    pub outstanding_balance: Option<Decimal>,
    #[serde(default, alias = "consolidada")]
    pub consolidated_flag: Option<Value>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: Option<Decimal>,
    #[serde(default, alias = "amortizacao", deserialize_with = "lenient_amount")]
    pub amortization: Option<Decimal>,
    #[serde(default, alias = "saldo", deserialize_with = "lenient_amount")]
    pub balance: Option<Decimal>,
    #[serde(default, alias = "provisao", deserialize_with = "lenient_amount")]
    pub provision: Option<Decimal>,
    #[serde(default, alias = "jurosAcumulado", deserialize_with = "lenient_amount")]
    pub accrued_interest: Option<Decimal>,
    #[serde(default, alias = "pago", deserialize_with = "lenient_amount")]
    pub paid: Option<Decimal>,
}

impl ScheduleRow {
    /// The consolidated flag as display text; falsy values render empty.
    pub fn consolidated_text(&self) -> String {
        match &self.consolidated_flag {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Body returned by the calculation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub rows: Option<Vec<ScheduleRow>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CalculationResponse {
    pub fn succeeded(rows: Vec<ScheduleRow>) -> Self {
        Self {
            success: true,
            rows: Some(rows),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            rows: None,
            message: Some(message.into()),
        }
    }
}

/// A failed HTTP exchange. `status` is 0 when no response was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub status: u16,
    pub description: String,
    pub body: Option<String>,
}

impl TransportFailure {
    /// The request never produced a response (refused, unreachable, timed out).
    pub fn no_response(description: impl Into<String>) -> Self {
        Self {
            status: 0,
            description: description.into(),
            body: None,
        }
    }

    pub fn with_status(status: u16, description: impl Into<String>, body: Option<String>) -> Self {
        Self {
            status,
            description: description.into(),
            body,
        }
    }

    /// `message` field of a JSON body, when there is one.
    pub fn server_message(&self) -> Option<String> {
        let body = self.body.as_deref()?;
        let value: Value = serde_json::from_str(body).ok()?;
        match value.get("message")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Message for the error banner: server message, then connection
    /// failure, then a generic status line.
    pub fn user_message(&self) -> String {
        if let Some(msg) = self.server_message() {
            return msg;
        }
        if self.status == 0 {
            return messages::CONNECTION_FAILED.to_string();
        }
        format!("Error {}: {}", self.status, self.description)
    }
}
