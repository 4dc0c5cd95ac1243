//! Calculation services for the loan form.
//!
//! [`calculation::CalculationService`] is the seam between the form
//! controller and the remote amortization server. The HTTP implementation
//! lives behind the default `http` feature.

pub mod calculation;

pub use calculation::{CalculationService, NetworkConfig, StaticCalculationService};

#[cfg(feature = "http")]
pub use calculation::HttpCalculationService;
