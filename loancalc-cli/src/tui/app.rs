//! Application state: focus, the text input and the running request.

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use tui_input::Input;

use loancalc::prelude::*;
use loancalc_client::CalculationService;

/// What the keyboard is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    Calculate,
    Clear,
}

/// Main application state
pub struct App {
    /// Whether the app should keep running
    pub running: bool,
    pub controller: FormController,
    /// Text input widget state for the focused field
    pub input: Input,
    focus_index: usize,
    /// First schedule row shown in the results table
    pub table_offset: usize,
    /// Hint shown in the status bar after a blocked action
    pub notice: Option<String>,
    service: Arc<dyn CalculationService>,
    runtime: Handle,
    outcome_tx: UnboundedSender<CalculationOutcome>,
    outcome_rx: UnboundedReceiver<CalculationOutcome>,
}

impl App {
    pub fn new(
        controller: FormController,
        service: Arc<dyn CalculationService>,
        runtime: Handle,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            running: true,
            controller,
            input: Input::default(),
            focus_index: 0,
            table_offset: 0,
            notice: None,
            service,
            runtime,
            outcome_tx,
            outcome_rx,
        };
        app.load_input();
        app
    }

    // ── focus ─────────────────────────────────────────────────────

    /// Focus ring: the layout's fields, then the two buttons.
    pub fn focus_targets(&self) -> Vec<Focus> {
        self.controller
            .form()
            .layout()
            .fields()
            .iter()
            .map(|id| Focus::Field(*id))
            .chain([Focus::Calculate, Focus::Clear])
            .collect()
    }

    pub fn focus(&self) -> Focus {
        let targets = self.focus_targets();
        targets[self.focus_index.min(targets.len() - 1)]
    }

    pub fn focused_field(&self) -> Option<FieldId> {
        match self.focus() {
            Focus::Field(id) => Some(id),
            _ => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.commit();
        let len = self.focus_targets().len();
        self.focus_index = (self.focus_index + 1) % len;
        self.load_input();
    }

    pub fn focus_prev(&mut self) {
        self.commit();
        let len = self.focus_targets().len();
        self.focus_index = (self.focus_index + len - 1) % len;
        self.load_input();
    }

    pub fn focus_on(&mut self, target: Focus) {
        if let Some(pos) = self.focus_targets().iter().position(|f| *f == target) {
            self.commit();
            self.focus_index = pos;
            self.load_input();
        }
    }

    fn load_input(&mut self) {
        self.input = match self.focused_field() {
            Some(id) => Input::default().with_value(self.controller.form().value(id).to_string()),
            None => Input::default(),
        };
    }

    // ── field events ──────────────────────────────────────────────

    /// Forwards the focused input's text as a keystroke-level event.
    pub fn on_input(&mut self) {
        if let Some(id) = self.focused_field() {
            self.controller.input(id, self.input.value());
        }
    }

    /// Forwards the focused input's text as a committed value.
    pub fn commit(&mut self) {
        if let Some(id) = self.focused_field() {
            self.controller.change(id, self.input.value());
        }
    }

    // ── actions ───────────────────────────────────────────────────

    /// Validates and, when the form passes, sends the request in the background.
    pub fn submit(&mut self) {
        self.commit();
        match self.controller.begin_submit() {
            Ok(request) => {
                self.notice = None;
                let service = Arc::clone(&self.service);
                let tx = self.outcome_tx.clone();
                self.runtime.spawn(async move {
                    let outcome = service.calculate(&request).await;
                    if tx.send(outcome).is_err() {
                        warn!("calculation finished after the UI closed");
                    }
                });
            }
            Err(LoanError::InvalidForm { fields }) => {
                self.notice = Some("Fix the highlighted fields".to_string());
                if let Some(first) = fields.first() {
                    self.focus_on(Focus::Field(*first));
                }
            }
            Err(LoanError::RequestInFlight) => {
                self.notice = Some("A calculation is already running".to_string());
            }
            Err(e) => {
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.table_offset = 0;
        self.notice = None;
        self.focus_index = 0;
        self.load_input();
    }

    /// Closes whichever alert banner is showing.
    pub fn close_alert(&mut self) {
        let visible = self.controller.alerts().visible();
        self.controller.close_alert(visible);
    }

    pub fn scroll_down(&mut self) {
        let rows = self.controller.results().rows.len();
        if self.table_offset + 1 < rows {
            self.table_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.table_offset = self.table_offset.saturating_sub(1);
    }

    /// Once per loop: collects finished requests and advances alert timers.
    pub fn on_tick(&mut self) {
        let now = Instant::now();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.controller.finish_submit(outcome, now);
        }
        self.controller.tick(now);
        if self.controller.take_scroll_request() {
            debug!("results revealed");
            self.table_offset = 0;
        }
    }
}
