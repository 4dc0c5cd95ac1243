//! Prelude module for loancalc
//!
//! Re-exports the types a front-end needs to drive the form.
//!
//! # Usage
//!
//! ```rust
//! use loancalc::prelude::*;
//! ```

// Core exports
pub use crate::config::ControllerConfig;
pub use crate::controller::{CalculationOutcome, FormController, ResultsView};
pub use crate::types::{FieldId, FieldRole, LoanError, messages};

// Form state and events
pub use crate::alert::{AlertKind, AlertState};
pub use crate::dates::{CompetenceDate, DateParsing};
pub use crate::events::{EventKind, FieldEvent};
pub use crate::form::{FieldState, FormField, FormLayout};

// Wire and display
pub use crate::format::{BrlFormatter, CurrencyFormatter, RenderedRow, SCHEDULE_COLUMNS};
pub use crate::schedule::{
    CalculationResponse, LoanRequest, ScheduleRow, TransportFailure, WireFormat,
};
