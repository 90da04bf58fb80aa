//! Question step screens (steps 1-4)
//!
//! Every step is rendered from a list of [`OptionView`]s built from the
//! controller. The same list resolves the highlighted row into the
//! [`SelectionEvent`] the controller consumes, so what is drawn and what is
//! selected cannot disagree.

use crate::app::AppState;
use crate::pricing::PRICE_RANGES;
use crate::questionnaire::{QuestionnaireController, SelectionKind, SubKey, WizardStep};
use crate::theme::{Colors, Styles};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// One choosable row of a question step.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub detail: Option<String>,
    pub chosen: bool,
}

/// What choosing the highlighted row means to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub step: WizardStep,
    pub id: String,
    pub kind: SelectionKind,
    pub sub_key: Option<SubKey>,
}

/// Radio or checkbox, per step.
pub fn selection_kind(step: WizardStep) -> SelectionKind {
    match step {
        WizardStep::Software | WizardStep::Features => SelectionKind::Checkbox,
        _ => SelectionKind::Radio,
    }
}

/// Options of the current step. On the features step `list` picks features or ports.
pub fn step_options(controller: &QuestionnaireController, list: SubKey) -> Vec<OptionView> {
    let step = controller.step();
    let selections = &controller.state().selections;
    let sub_key = (step == WizardStep::Features).then_some(list);
    let chosen = |id: &str| selections.is_selected(step, id, sub_key);

    match step {
        WizardStep::Category => controller
            .categories()
            .iter()
            .map(|category| {
                let id = category.id.to_string();
                let lines = category.desc_lines();
                OptionView {
                    chosen: chosen(&id),
                    id,
                    label: match &category.icon {
                        Some(icon) => format!("{} {}", icon, category.label()),
                        None => category.label(),
                    },
                    detail: (!lines.is_empty()).then(|| lines.join(" · ")),
                }
            })
            .collect(),
        WizardStep::Software => controller
            .programs()
            .iter()
            .map(|program| OptionView {
                chosen: chosen(&program.id),
                id: program.id.clone(),
                label: program.name.clone(),
                detail: Some(program.desc.clone()),
            })
            .collect(),
        WizardStep::Features => {
            let rows = match list {
                SubKey::Features => controller.features(),
                SubKey::Ports => controller.ports(),
            };
            rows.iter()
                .map(|row| {
                    let id = row.id.to_string();
                    OptionView {
                        chosen: chosen(&id),
                        id,
                        label: row.name.clone(),
                        detail: None,
                    }
                })
                .collect()
        }
        WizardStep::Budget => PRICE_RANGES
            .iter()
            .map(|range| OptionView {
                chosen: chosen(range.id),
                id: range.id.to_string(),
                label: range.label.to_string(),
                detail: None,
            })
            .collect(),
        WizardStep::Results | WizardStep::Comparison | WizardStep::Details => Vec::new(),
    }
}

/// The event for choosing row `cursor` of the current step.
pub fn selection_event(
    controller: &QuestionnaireController,
    list: SubKey,
    cursor: usize,
) -> Option<SelectionEvent> {
    let step = controller.step();
    let option = step_options(controller, list).into_iter().nth(cursor)?;
    Some(SelectionEvent {
        step,
        id: option.id,
        kind: selection_kind(step),
        sub_key: (step == WizardStep::Features).then_some(list),
    })
}

fn option_items(options: &[OptionView], kind: SelectionKind) -> Vec<ListItem<'static>> {
    options
        .iter()
        .map(|option| {
            let marker = match (kind, option.chosen) {
                (SelectionKind::Radio, true) => "(•) ",
                (SelectionKind::Radio, false) => "( ) ",
                (SelectionKind::Checkbox, true) => "[x] ",
                (SelectionKind::Checkbox, false) => "[ ] ",
            };
            let label_style = if option.chosen {
                Styles::chosen()
            } else {
                Styles::text()
            };
            let mut lines = vec![Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(option.label.clone(), label_style),
            ])];
            if let Some(detail) = &option.detail {
                lines.push(Line::from(Span::styled(
                    format!("    {}", detail),
                    Styles::text_muted(),
                )));
            }
            ListItem::new(lines)
        })
        .collect()
}

fn render_option_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    options: &[OptionView],
    kind: SelectionKind,
    cursor: Option<usize>,
) {
    let focused = cursor.is_some();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border_inactive()
        });

    if options.is_empty() {
        f.render_widget(
            Paragraph::new("Nothing to choose from here.")
                .style(Styles::text_muted())
                .block(block),
            area,
        );
        return;
    }

    let list = List::new(option_items(options, kind))
        .block(block)
        .highlight_style(Style::default().bg(Colors::BG_PRIMARY).fg(Colors::PRIMARY))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(cursor);
    f.render_stateful_widget(list, area, &mut list_state);
}

/// Render the current question step
pub fn render_question(
    f: &mut Frame,
    area: Rect,
    controller: &QuestionnaireController,
    state: &AppState,
) {
    let step = controller.step();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let mut heading = vec![Span::styled(step.title(), Styles::title())];
    if step == WizardStep::Software {
        heading.push(Span::styled("  (optional)", Styles::text_muted()));
    }
    f.render_widget(
        Paragraph::new(Line::from(heading)).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let kind = selection_kind(step);
    if step == WizardStep::Features {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        for (sub_key, column, title) in [
            (SubKey::Features, columns[0], "Features"),
            (SubKey::Ports, columns[1], "Ports"),
        ] {
            let options = step_options(controller, sub_key);
            let cursor = (state.list() == sub_key).then_some(state.cursor);
            render_option_list(f, column, title, &options, kind, cursor);
        }
    } else {
        let options = step_options(controller, SubKey::Features);
        let title = match step {
            WizardStep::Category => "Usage",
            WizardStep::Software => "Programs",
            _ => "Price range",
        };
        render_option_list(f, chunks[1], title, &options, kind, Some(state.cursor));
    }
}
