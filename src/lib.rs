//! Loan amortization form controller.
//!
//! Field validation, date consistency, the submit gate, the calculation
//! payload, pt-BR rendering of the returned schedule and the alert banners.
//! Front-ends (the `loancalc-cli` TUI, tests) feed [`events::FieldEvent`]s in
//! and read state back out of [`controller::FormController`].

pub mod alert;
pub mod config;
pub mod controller;
pub mod dates;
pub mod events;
pub mod form;
pub mod format;
pub mod prelude;
pub mod schedule;
pub mod types;
pub mod validation;

pub use config::ControllerConfig;
pub use controller::FormController;
pub use schedule::{CalculationResponse, LoanRequest, ScheduleRow, TransportFailure};
pub use types::{FieldId, LoanError};
