//! UI rendering for the TUI.
//!
//! Header, alert banner, the form on the left, the schedule table on the
//! right and a status bar. Everything is read from the controller; nothing
//! here mutates state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, Wrap},
};

use loancalc::alert::AlertKind;
use loancalc::form::{FieldState, FormField};
use loancalc::format::SCHEDULE_COLUMNS;

use crate::tui::app::{App, Focus};
use crate::tui::components::LoadingSpinner;
use crate::tui::theme::{icons, theme};

/// Width of the label column in the form.
const LABEL_WIDTH: usize = 16;

// ═══════════════════════════════════════════════════════════════════════════
// MAIN UI ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════

pub fn ui(frame: &mut Frame, app: &App) {
    let t = theme();

    frame.render_widget(Clear, frame.area());
    frame.render_widget(Block::default().style(t.bg()), frame.area());

    let banner_height = if app.controller.alerts().visible() == AlertKind::None {
        0
    } else {
        1
    };

    // Root Layout: Header | Banner | Main Content | Status Bar
    let root_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, root_layout[0], app);
    render_banner(frame, root_layout[1], app);
    render_content(frame, root_layout[2], app);
    render_status_bar(frame, root_layout[3], app);
}

// ═══════════════════════════════════════════════════════════════════════════
// HEADER
// ═══════════════════════════════════════════════════════════════════════════

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let t = theme();

    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(t.border_inactive())
        .style(t.bg());

    let inner = header_block.inner(area);
    frame.render_widget(header_block, area);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(inner);

    let brand = Line::from(vec![
        Span::raw(" "),
        Span::styled(icons::BANK, Style::default().fg(t.brand)),
        Span::raw(" "),
        Span::styled("LOAN", t.title()),
        Span::styled(
            "CALC",
            Style::default()
                .fg(t.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(brand).alignment(Alignment::Left), layout[0]);

    let config = app.controller.config();
    let endpoint = Line::from(vec![
        Span::styled("Server: ", t.subtitle()),
        Span::styled(config.base_url.clone(), t.text()),
        Span::raw("  "),
        Span::styled(icons::SEPARATOR, t.border_inactive()),
        Span::raw("  "),
        Span::styled("pt-BR ", t.subtitle()),
    ]);
    frame.render_widget(
        Paragraph::new(endpoint).alignment(Alignment::Right),
        layout[1],
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// ALERT BANNER
// ═══════════════════════════════════════════════════════════════════════════

fn render_banner(frame: &mut Frame, area: Rect, app: &App) {
    let t = theme();
    let alerts = app.controller.alerts();
    let (icon, error) = match alerts.visible() {
        AlertKind::None => return,
        AlertKind::Error => (icons::CROSS, true),
        AlertKind::Success => (icons::CHECK, false),
    };
    let message = alerts.message().unwrap_or_default();

    let line = Line::from(vec![
        Span::raw(format!(" {} ", icon)),
        Span::raw(message.to_string()),
        Span::raw(format!("   {} [Esc]", icons::CLOSE)),
    ]);
    frame.render_widget(Paragraph::new(line).style(t.banner(error)), area);
}

// ═══════════════════════════════════════════════════════════════════════════
// MAIN CONTENT
// ═══════════════════════════════════════════════════════════════════════════

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    // Layout: Form | Results
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(64), Constraint::Min(0)])
        .split(area);

    render_form(frame, chunks[0], app);
    render_results(frame, chunks[1], app);
}

// ═══════════════════════════════════════════════════════════════════════════
// FORM
// ═══════════════════════════════════════════════════════════════════════════

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let t = theme();

    let block = Block::default()
        .title(" Loan ")
        .title_style(t.title())
        .borders(Borders::RIGHT)
        .border_style(t.border_inactive())
        .style(t.bg())
        .padding(Padding::new(1, 1, 1, 0));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields: Vec<&FormField> = app.controller.form().fields().collect();

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(2)).collect();
    constraints.push(Constraint::Length(1)); // Spacer
    constraints.push(Constraint::Length(1)); // Buttons
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in fields.iter().enumerate() {
        let focused = app.focused_field() == Some(field.id);
        let input_value = focused.then(|| app.input.value());
        render_form_field(frame, chunks[i], field, input_value);
    }

    render_buttons(frame, chunks[fields.len() + 1], app);
}

/// Renders one field: label, value and marker, with the error text below.
fn render_form_field(frame: &mut Frame, area: Rect, field: &FormField, input_value: Option<&str>) {
    let t = theme();
    let focused = input_value.is_some();

    let label_style = if focused {
        t.title()
    } else {
        t.subtitle()
    };

    let (display_value, value_style) = match input_value {
        Some(input) => (format!("{}{}", input, icons::CURSOR), t.title()),
        None if field.value.is_empty() => (
            field.id.hint().to_string(),
            t.subtitle().add_modifier(Modifier::ITALIC),
        ),
        None => (field.value.clone(), t.text()),
    };

    let marker = match field.state {
        FieldState::Pristine => Span::raw(""),
        FieldState::Valid => Span::styled(format!(" {}", icons::CHECK), t.success_style()),
        FieldState::Invalid => Span::styled(format!(" {}", icons::CROSS), t.error_style()),
    };

    let indicator = if focused {
        format!("{} ", icons::ARROW_RIGHT)
    } else {
        "  ".to_string()
    };
    let required = if field.id.is_required() { "" } else { "?" };

    let line = Line::from(vec![
        Span::styled(indicator, t.border_active()),
        Span::styled(
            format!(
                "{:<width$}",
                format!("{}{}:", field.id.label(), required),
                width = LABEL_WIDTH
            ),
            label_style,
        ),
        Span::styled(display_value, value_style),
        marker,
    ]);

    let error_line = match &field.error {
        Some(error) => Line::from(vec![
            Span::raw("    "),
            Span::styled(error.clone(), Style::default().fg(t.error)),
        ]),
        None => Line::from(""),
    };

    frame.render_widget(Paragraph::new(vec![line, error_line]), area);

    if let Some(input) = input_value {
        let cursor_x = area.x + (2 + LABEL_WIDTH + input.chars().count()) as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
    }
}

fn render_buttons(frame: &mut Frame, area: Rect, app: &App) {
    let t = theme();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(17),
            Constraint::Length(2),
            Constraint::Length(13),
            Constraint::Min(0),
        ])
        .split(area);

    let calculate_style = if app.focus() == Focus::Calculate {
        t.highlight()
    } else if app.controller.submit_enabled() {
        Style::default().fg(t.navy).bg(t.success)
    } else {
        t.disabled()
    };
    frame.render_widget(
        Paragraph::new(" Calculate [^S] ")
            .style(calculate_style)
            .alignment(Alignment::Center),
        layout[1],
    );

    let clear_style = if app.focus() == Focus::Clear {
        t.highlight()
    } else {
        Style::default().fg(t.text_primary).bg(t.navy_light)
    };
    frame.render_widget(
        Paragraph::new(" Clear [^R] ")
            .style(clear_style)
            .alignment(Alignment::Center),
        layout[3],
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════════

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let t = theme();

    let block = Block::default()
        .title(" Amortization Schedule ")
        .title_style(t.subtitle())
        .borders(Borders::NONE)
        .style(t.bg())
        .padding(Padding::new(1, 1, 0, 0));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.controller.is_loading() {
        let frame_idx = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            / 200) as usize;
        LoadingSpinner::new("Calculating schedule...")
            .frame(frame_idx)
            .render(frame, inner);
        return;
    }

    let results = app.controller.results();
    if !results.visible {
        render_empty_results(frame, inner);
        return;
    }

    let rows: Vec<Row> = results
        .rows
        .iter()
        .skip(app.table_offset)
        .map(|row| {
            Row::new(
                row.cells
                    .iter()
                    .map(|cell| Cell::from(cell.clone()))
                    .collect::<Vec<_>>(),
            )
            .style(t.text())
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(SCHEDULE_COLUMNS.to_vec())
                .style(t.subtitle().add_modifier(Modifier::UNDERLINED)),
        )
        .column_spacing(1)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Plain)
                .border_style(t.border_inactive())
                .title(format!(
                    " {} rows ",
                    results.rows.len()
                ))
                .title_style(t.subtitle()),
        );

    frame.render_widget(table, inner);
}

fn render_empty_results(frame: &mut Frame, area: Rect) {
    let t = theme();
    let center = centered_rect(80, 30, area);

    let msg = Paragraph::new(vec![
        Line::from(Span::styled("No schedule yet", t.subtitle())),
        Line::from(Span::styled(
            "Fill in the form and press Calculate",
            Style::default().fg(t.brand),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(msg, center);
}

// ═══════════════════════════════════════════════════════════════════════════
// STATUS BAR
// ═══════════════════════════════════════════════════════════════════════════

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let t = theme();

    let status = if let Some(notice) = &app.notice {
        Span::styled(format!(" {} ", notice), t.banner(true))
    } else {
        let mode = if app.controller.is_loading() {
            "LOADING"
        } else if app.controller.submit_enabled() {
            "READY"
        } else {
            "EDITING"
        };
        Span::styled(
            format!(" {} ", mode),
            Style::default().bg(t.navy_light).fg(t.text_muted),
        )
    };

    let keys = Span::styled(
        " [Tab] Next  [^S] Calculate  [^R] Clear  [PgUp/PgDn] Scroll  [^C] Quit ",
        t.accent_style(),
    );

    let bar = Line::from(vec![status, Span::raw(" "), keys]);
    frame.render_widget(Paragraph::new(bar).style(t.bg()), area);
}

// ═══════════════════════════════════════════════════════════════════════════
// UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Helper to center a rect within a parent.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod ui_tests;
