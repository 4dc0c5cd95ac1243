//! # TUI Module
//!
//! Full-screen terminal front-end for the loan form, built with ratatui.
//! The [`App`] owns a [`loancalc::FormController`] and forwards keystrokes
//! to it as field events; rendering reads the controller state back.

pub mod app;
pub mod components;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use event::handle_events;
pub use ui::ui;
