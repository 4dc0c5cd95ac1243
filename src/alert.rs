//! Error and success banners with auto-dismiss timers.
//!
//! Timers are fire-and-forget: hiding a banner or showing a new message does
//! not cancel a timer that is already pending, and whichever timer expires
//! first hides the banner.

use std::time::{Duration, Instant};

use tracing::debug;

/// Which banner is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    #[default]
    None,
    Error,
    Success,
}

#[derive(Debug, Clone, Default)]
pub struct Banner {
    visible: bool,
    message: String,
    hide_at: Vec<Instant>,
}

impl Banner {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn show(&mut self, message: String, now: Instant, duration: Duration) {
        self.message = message;
        self.visible = true;
        self.hide_at.push(now + duration);
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    /// Fires expired timers; returns whether one of them hid the banner.
    fn tick(&mut self, now: Instant) -> bool {
        let before = self.hide_at.len();
        self.hide_at.retain(|deadline| *deadline > now);
        let fired = self.hide_at.len() < before;
        if fired && self.visible {
            self.visible = false;
            return true;
        }
        false
    }

    pub fn pending_timers(&self) -> usize {
        self.hide_at.len()
    }
}

/// The controller's alert state: one error and one success banner.
#[derive(Debug, Clone)]
pub struct AlertState {
    error: Banner,
    success: Banner,
    error_duration: Duration,
    success_duration: Duration,
}

impl AlertState {
    pub fn new(error_duration: Duration, success_duration: Duration) -> Self {
        Self {
            error: Banner::default(),
            success: Banner::default(),
            error_duration,
            success_duration,
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        self.error.show(message.into(), now, self.error_duration);
    }

    pub fn show_success(&mut self, message: impl Into<String>, now: Instant) {
        self.success.show(message.into(), now, self.success_duration);
    }

    /// Hides both banners; pending timers keep running.
    pub fn hide_all(&mut self) {
        self.error.hide();
        self.success.hide();
    }

    /// Manual close affordance.
    pub fn close(&mut self, kind: AlertKind) {
        match kind {
            AlertKind::Error => self.error.hide(),
            AlertKind::Success => self.success.hide(),
            AlertKind::None => {}
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if self.error.tick(now) {
            debug!("error alert auto-dismissed");
        }
        if self.success.tick(now) {
            debug!("success alert auto-dismissed");
        }
    }

    /// The visible banner; an error wins over a success.
    pub fn visible(&self) -> AlertKind {
        if self.error.is_visible() {
            AlertKind::Error
        } else if self.success.is_visible() {
            AlertKind::Success
        } else {
            AlertKind::None
        }
    }

    /// Message of the visible banner.
    pub fn message(&self) -> Option<&str> {
        match self.visible() {
            AlertKind::Error => Some(self.error.message()),
            AlertKind::Success => Some(self.success.message()),
            AlertKind::None => None,
        }
    }

    pub fn error(&self) -> &Banner {
        &self.error
    }

    pub fn success(&self) -> &Banner {
        &self.success
    }
}
