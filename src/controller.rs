//! The form controller.
//!
//! Owns the field records, the alert state and the rendered results, and
//! moves them through the event → verdict → apply cycle. It never performs
//! I/O: the front-end takes the [`LoanRequest`] returned by
//! [`FormController::begin_submit`], runs the network call, and hands the
//! outcome back through [`FormController::finish_submit`].

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::alert::{AlertKind, AlertState};
use crate::config::ControllerConfig;
use crate::events::{EventBindings, FieldEvent, Reaction};
use crate::form::{Form, FormField};
use crate::format::{BrlFormatter, RenderedRow, render_rows};
use crate::schedule::{CalculationResponse, LoanRequest, TransportFailure};
use crate::types::{FieldId, LoanError, messages};

/// The results area below the form.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    pub rows: Vec<RenderedRow>,
    pub visible: bool,
    scroll_requested: bool,
}

/// Outcome of one calculation request as seen by the controller.
pub type CalculationOutcome = Result<CalculationResponse, TransportFailure>;

#[derive(Debug)]
pub struct FormController {
    config: ControllerConfig,
    form: Form,
    bindings: EventBindings,
    alerts: AlertState,
    results: ResultsView,
    loading: bool,
    in_flight: usize,
    currency: BrlFormatter,
}

impl FormController {
    pub fn new(config: ControllerConfig) -> Result<Self, LoanError> {
        config.validate()?;
        let form = Form::new(config.layout, config.date_parsing);
        let bindings = EventBindings::for_layout(config.layout);
        let alerts = AlertState::new(config.error_alert(), config.success_alert());
        Ok(Self {
            form,
            bindings,
            alerts,
            results: ResultsView::default(),
            loading: false,
            in_flight: 0,
            currency: BrlFormatter::new()?,
            config,
        })
    }

    // ── read side ─────────────────────────────────────────────────

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn field(&self, id: FieldId) -> Option<&FormField> {
        self.form.field(id)
    }

    pub fn alerts(&self) -> &AlertState {
        &self.alerts
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// The validity gate; recomputed on every call.
    pub fn submit_enabled(&self) -> bool {
        let gate = self.form.submit_enabled();
        if self.config.guard_double_submit {
            gate && self.in_flight == 0
        } else {
            gate
        }
    }

    /// Returns and clears the pending scroll-into-view request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.results.scroll_requested)
    }

    // ── events ────────────────────────────────────────────────────

    /// Stores the event's value and runs the reactions bound to it.
    pub fn dispatch(&mut self, event: FieldEvent) {
        if !self.form.set_value(event.field, event.value) {
            debug!(field = %event.field, "event for a field outside the layout ignored");
            return;
        }
        let reactions = self.bindings.reactions(event.field, event.kind).to_vec();
        for reaction in reactions {
            match reaction {
                Reaction::ValidateField => {
                    let verdict = self.form.evaluate_field(event.field);
                    self.form.apply_field(event.field, &verdict);
                }
                Reaction::ValidateDates => {
                    let verdict = self.form.evaluate_dates();
                    self.form.apply_dates(&verdict);
                }
            }
        }
    }

    /// Convenience for a keystroke-level update.
    pub fn input(&mut self, field: FieldId, value: impl Into<String>) {
        self.dispatch(FieldEvent::input(field, value));
    }

    /// Convenience for a committed value.
    pub fn change(&mut self, field: FieldId, value: impl Into<String>) {
        self.dispatch(FieldEvent::change(field, value));
    }

    // ── submission ────────────────────────────────────────────────

    /// Validates the whole form and, if it passes, enters the loading state
    /// and returns the request to send.
    pub fn begin_submit(&mut self) -> Result<LoanRequest, LoanError> {
        if self.config.guard_double_submit && self.in_flight > 0 {
            warn!("submit ignored: request already in flight");
            return Err(LoanError::RequestInFlight);
        }

        let invalid = self.form.validate_all();
        if !invalid.is_empty() {
            info!(fields = ?invalid, "submit blocked by validation");
            return Err(LoanError::InvalidForm { fields: invalid });
        }
        let request = self.form.to_request()?;

        self.alerts.hide_all();
        self.loading = true;
        self.results.visible = false;
        self.in_flight += 1;

        info!(
            start = %request.start_date,
            end = %request.end_date,
            first_payment = %request.first_payment_date,
            amount = %request.loan_amount,
            rate = %request.interest_rate,
            "calculation submitted"
        );
        Ok(request)
    }

    /// Feeds a request outcome back into the controller.
    pub fn finish_submit(&mut self, outcome: CalculationOutcome, now: Instant) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = false;

        match outcome {
            Ok(CalculationResponse {
                success: true,
                rows: Some(rows),
                ..
            }) => {
                info!(rows = rows.len(), "calculation succeeded");
                self.results.rows = render_rows(&rows, &self.currency);
                self.results.visible = true;
                self.results.scroll_requested = true;
                self.alerts
                    .show_success(messages::CALCULATION_SUCCEEDED, now);
            }
            Ok(response) => {
                let message = response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| messages::CALCULATION_FAILED.to_string());
                warn!(%message, "calculation rejected by server");
                self.alerts.show_error(message, now);
            }
            Err(failure) => {
                warn!(
                    status = failure.status,
                    description = %failure.description,
                    "calculation request failed"
                );
                self.alerts.show_error(failure.user_message(), now);
            }
        }
    }

    // ── housekeeping ──────────────────────────────────────────────

    /// Clears every field, hides results and alerts.
    pub fn reset(&mut self) {
        self.form.reset();
        self.results = ResultsView::default();
        self.alerts.hide_all();
        debug!("form reset");
    }

    pub fn close_alert(&mut self, kind: AlertKind) {
        self.alerts.close(kind);
    }

    /// Advances alert timers.
    pub fn tick(&mut self, now: Instant) {
        self.alerts.tick(now);
    }
}
