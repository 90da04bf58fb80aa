//! Navigation bar: key hints for the current screen on one line.

use super::keybindings::NavBarItem;
use crate::theme::{Colors, Styles};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub struct NavBar {
    items: Vec<NavBarItem>,
}

impl NavBar {
    pub fn new(items: Vec<NavBarItem>) -> Self {
        Self { items }
    }

    pub fn line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(self.items.len() * 3);
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Styles::nav_hint()));
            }
            spans.push(Span::styled(
                format!(" {} ", item.key_display),
                Style::default()
                    .fg(Colors::SELECTED_FG)
                    .bg(Colors::FG_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(format!(" {}", item.action_label), Styles::text_secondary()));
        }
        Line::from(spans)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(Paragraph::new(self.line()), area);
    }
}
