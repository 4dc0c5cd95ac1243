//! Theme for the loan calculator TUI.
//!
//! A navy background with a teal brand color; red and green carry the
//! invalid/valid field markers and the two alert banners.

use ratatui::style::{Color, Modifier, Style};

/// Colors and pre-computed styles.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Brand accent, focused borders
    pub brand: Color,
    /// Main background
    pub navy: Color,
    /// Panel backgrounds, inactive borders
    pub navy_light: Color,

    pub text_primary: Color,
    pub text_muted: Color,
    /// Invalid marker and error banner
    pub error: Color,
    /// Valid marker and success banner
    pub success: Color,
    /// Key hints
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            brand: Color::Rgb(20, 184, 166),
            navy: Color::Rgb(15, 23, 42),
            navy_light: Color::Rgb(30, 41, 59),
            text_primary: Color::Rgb(248, 250, 252),
            text_muted: Color::Rgb(148, 163, 184),
            error: Color::Rgb(239, 68, 68),
            success: Color::Rgb(34, 197, 94),
            accent: Color::Cyan,
        }
    }
}

impl Theme {
    // ─────────────────────────────────────────────────────────────
    // Pre-computed Styles
    // ─────────────────────────────────────────────────────────────

    pub fn title(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    pub fn subtitle(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Focused button
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.navy)
            .bg(self.brand)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active(&self) -> Style {
        Style::default().fg(self.brand)
    }

    pub fn border_inactive(&self) -> Style {
        Style::default().fg(self.navy_light)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn bg(&self) -> Style {
        Style::default().bg(self.navy)
    }

    /// Disabled button
    pub fn disabled(&self) -> Style {
        Style::default()
            .fg(self.text_muted)
            .bg(self.navy_light)
            .add_modifier(Modifier::DIM)
    }

    /// Banner style for an error or success alert.
    pub fn banner(&self, error: bool) -> Style {
        let bg = if error { self.error } else { self.success };
        Style::default()
            .fg(self.navy)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }
}

/// Global theme instance.
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

pub fn theme() -> &'static Theme {
    &THEME
}

// ─────────────────────────────────────────────────────────────────────
// Unicode Icons
// ─────────────────────────────────────────────────────────────────────

pub mod icons {
    pub const BANK: &str = "🏦";
    pub const CHECK: &str = "✓";
    pub const CROSS: &str = "✗";
    pub const CLOSE: &str = "✕";
    pub const ARROW_RIGHT: &str = "➜";
    pub const SEPARATOR: &str = "│";
    pub const CURSOR: &str = "▏";

    // Spinner frames for loading animation
    pub const SPINNER: &[&str] = &["◐", "◓", "◑", "◒"];
}
