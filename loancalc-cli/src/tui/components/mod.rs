//! Component widgets for the TUI.

pub mod spinner;

pub use spinner::LoadingSpinner;
