//! Floating window component
//!
//! A bordered popup centered over a parent area, sized as a percentage of
//! the parent and clamped to min/max dimensions.

use crate::theme::{Colors, Styles};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone)]
pub struct FloatingWindowConfig {
    pub title: String,
    pub width_percent: u16,
    pub height_percent: u16,
    pub min_width: u16,
    pub min_height: u16,
    pub max_width: u16,
    pub max_height: u16,
    pub border_color: Color,
}

impl Default for FloatingWindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            width_percent: 60,
            height_percent: 50,
            min_width: 30,
            min_height: 7,
            max_width: 100,
            max_height: 40,
            border_color: Colors::BORDER_ACTIVE,
        }
    }
}

pub struct FloatingWindow {
    config: FloatingWindowConfig,
}

impl FloatingWindow {
    pub fn new(config: FloatingWindowConfig) -> Self {
        Self { config }
    }

    /// Area of the window inside `parent`
    pub fn area(&self, parent: Rect) -> Rect {
        let c = &self.config;
        let width = (parent.width * c.width_percent / 100)
            .clamp(c.min_width, c.max_width.max(c.min_width))
            .min(parent.width);
        let height = (parent.height * c.height_percent / 100)
            .clamp(c.min_height, c.max_height.max(c.min_height))
            .min(parent.height);
        Rect::new(
            parent.x + (parent.width - width) / 2,
            parent.y + (parent.height - height) / 2,
            width,
            height,
        )
    }

    /// Clear the window area and draw its frame; returns the inner area.
    pub fn render_frame(&self, f: &mut Frame, parent: Rect) -> Rect {
        let area = self.area(parent);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(format!(" {} ", self.config.title), Styles::title()))
            .border_style(Style::default().fg(self.config.border_color))
            .style(Styles::panel_bg());
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        inner
    }

    /// Render wrapped lines with an optional footer hint on the last row.
    pub fn render_lines(&self, f: &mut Frame, parent: Rect, lines: &[Line<'_>], footer: Option<&str>) {
        let inner = self.render_frame(f, parent);
        let (body, footer_area) = match footer {
            Some(_) if inner.height > 1 => (
                Rect { height: inner.height - 1, ..inner },
                Some(Rect {
                    y: inner.y + inner.height - 1,
                    height: 1,
                    ..inner
                }),
            ),
            _ => (inner, None),
        };

        f.render_widget(
            Paragraph::new(lines.to_vec()).wrap(Wrap { trim: false }),
            body,
        );
        if let (Some(text), Some(area)) = (footer, footer_area) {
            f.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(Styles::nav_hint()),
                area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_is_centered_and_clamped() {
        let window = FloatingWindow::new(FloatingWindowConfig {
            width_percent: 50,
            height_percent: 50,
            min_width: 10,
            min_height: 5,
            max_width: 30,
            max_height: 20,
            ..Default::default()
        });
        let area = window.area(Rect::new(0, 0, 100, 40));
        assert_eq!(area, Rect::new(35, 10, 30, 20));

        // Never larger than the parent
        let small = window.area(Rect::new(0, 0, 8, 4));
        assert_eq!(small.width, 8);
        assert_eq!(small.height, 4);
    }
}
