//! Dialog rendering module
//!
//! Blocking alerts and the delete confirmation, both drawn as floating
//! windows over the current screen.

use crate::app::Alert;
use crate::components::floating_window::{FloatingWindow, FloatingWindowConfig};
use crate::theme::{Colors, Styles, Theme, UiConstants, UiText};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

fn dialog_config(title: &str, border_color: Color) -> FloatingWindowConfig {
    FloatingWindowConfig {
        title: title.to_string(),
        width_percent: UiConstants::DIALOG_WIDTH_PCT,
        height_percent: 30,
        min_width: UiConstants::DIALOG_MIN_WIDTH,
        max_width: UiConstants::DIALOG_MAX_WIDTH,
        min_height: 7,
        max_height: 14,
        border_color,
    }
}

/// Render a blocking alert
pub fn render_alert(f: &mut Frame, alert: &Alert) {
    let window = FloatingWindow::new(dialog_config(
        Theme::severity_title(alert.severity),
        Theme::severity_color(alert.severity),
    ));
    let lines: Vec<Line> = alert
        .message
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), Styles::text())))
        .collect();
    window.render_lines(f, f.area(), &lines, Some(UiText::PRESS_ENTER));
}

/// Render the delete confirmation for row `id`
pub fn render_confirm_delete(f: &mut Frame, id: i64, name: &str) {
    let window = FloatingWindow::new(dialog_config("Delete row", Colors::ERROR));
    let inner = window.render_frame(f, f.area());
    f.render_widget(
        Block::default().style(Styles::panel_bg_danger()),
        inner,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    let message = vec![
        Line::from(vec![
            Span::styled("Delete ", Styles::text()),
            Span::styled(format!("\"{}\"", name), Styles::warning()),
            Span::styled(format!(" (#{})?", id), Styles::text()),
        ]),
        Line::from(Span::styled("This cannot be undone.", Styles::text_muted())),
    ];
    f.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let buttons = Line::from(vec![
        Span::styled(UiText::BTN_CONFIRM_DELETE, Styles::button_danger()),
        Span::raw("   "),
        Span::styled(UiText::BTN_CANCEL, Styles::button_active()),
    ]);
    f.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Center),
        chunks[1],
    );
}
