//! Admin panel rendering: tab bar, paged table, add/edit forms and the
//! select-field dropdown.

use crate::admin::{AdminPanel, AddForm, EditState, FieldKind, SelectOption, TableMode, TableView};
use crate::app::AppState;
use crate::components::floating_window::{FloatingWindow, FloatingWindowConfig};
use crate::theme::{Colors, Styles, UiConstants, UiText};
use crate::types::AdminTab;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs},
};

/// Header label of a column, with the sort arrow when sorted on it.
pub fn column_header(table: &dyn TableView, index: usize) -> String {
    let Some(column) = table.columns().get(index) else {
        return String::new();
    };
    match table.sort() {
        Some(sort) if sort.key == column.key => format!("{} {}", column.label, sort.direction.arrow()),
        _ => column.label.clone(),
    }
}

/// "Page 2 of 3 · 57 rows · server paging"
pub fn pager_text(table: &dyn TableView) -> String {
    format!(
        "Page {} of {} · {} rows · {} paging",
        table.page_index() + 1,
        table.page_count(),
        table.total_count(),
        table.paging()
    )
}

/// Current value of an add-form field for display; select fields show the option name.
pub fn form_value(form: &AddForm, key: &str, kind: FieldKind, options: &[SelectOption]) -> String {
    let value = form.values.get(key).cloned().unwrap_or_default();
    match kind {
        FieldKind::Select(_) if !value.is_empty() => options
            .iter()
            .find(|option| option.id.to_string() == value)
            .map(|option| format!("{} (#{})", option.name, option.id))
            .unwrap_or(value),
        _ => value,
    }
}

fn render_tabs(f: &mut Frame, area: Rect, active: AdminTab) {
    let titles: Vec<Line> = AdminTab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(active.index())
        .block(Block::default().borders(Borders::BOTTOM).title(Span::styled(" Admin ", Styles::title())))
        .style(Styles::text_secondary())
        .highlight_style(Styles::selected())
        .divider("|");
    f.render_widget(tabs, area);
}

fn render_search_line(f: &mut Frame, area: Rect, table: &dyn TableView, state: &AppState) {
    let searching = matches!(table.mode(), TableMode::Search);
    let term = if searching {
        format!("{}_", state.search_input)
    } else {
        table.search().to_string()
    };
    let line = Line::from(vec![
        Span::styled("Search name: ", Styles::focused()),
        Span::styled(
            if term.is_empty() { "(none)".to_string() } else { term },
            if searching { Styles::chosen() } else { Styles::text() },
        ),
        Span::styled(format!("    {}", pager_text(table)), Styles::text_muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_table(f: &mut Frame, area: Rect, table: &dyn TableView, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .title(format!(" {} ", table.tab()));

    if table.row_count() == 0 {
        f.render_widget(
            Paragraph::new(UiText::NO_ROWS).style(Styles::text_muted()).block(block),
            area,
        );
        return;
    }

    let column_count = table.columns().len();
    let header = Row::new((0..column_count).map(|i| {
        let style = if i == state.admin_column {
            Styles::chosen()
        } else {
            Styles::header()
        };
        Cell::from(Span::styled(column_header(table, i), style))
    }));
    let rows: Vec<Row> = table.cells().into_iter().map(Row::new).collect();
    let widths: Vec<Constraint> = table
        .columns()
        .iter()
        .map(|c| {
            if c.is_id() {
                Constraint::Length(6)
            } else {
                Constraint::Fill(1)
            }
        })
        .collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(Styles::selected());
    let mut table_state = TableState::default().with_selected(Some(table.selected()));
    f.render_stateful_widget(widget, area, &mut table_state);
}

fn render_add_form(f: &mut Frame, table: &dyn TableView, panel: &AdminPanel) {
    let form = table.form();
    let window = FloatingWindow::new(FloatingWindowConfig {
        title: format!("Add {}", table.tab()),
        width_percent: 70,
        height_percent: 80,
        min_height: 12,
        ..Default::default()
    });
    let inner = window.render_frame(f, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let mut dropdown_anchor = None;
    let lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let options: &[SelectOption] = match field.kind {
                FieldKind::Select(source) => panel
                    .options()
                    .get(&source)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
                _ => &[],
            };
            let mut spans = vec![
                Span::styled(if focused { "> " } else { "  " }, Styles::focused()),
                Span::styled(
                    format!("{:<16}", format!("{}{}", field.label, if field.required { " *" } else { "" })),
                    if focused { Styles::focused() } else { Styles::text_secondary() },
                ),
                Span::styled(form_value(form, field.key, field.kind, options), Styles::text()),
            ];
            if let Some(filter) = form.filter(field.key) {
                if focused || !filter.input().is_empty() {
                    spans.push(Span::styled(
                        format!("  filter: {}{}", filter.input(), if focused { "_" } else { "" }),
                        Styles::text_muted(),
                    ));
                }
                if focused {
                    dropdown_anchor = Some(i as u16);
                }
            }
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[0]);
    f.render_widget(
        Paragraph::new("Type to fill a field · select fields: type 2+ letters, Up/Down, Enter · Ctrl+S saves")
            .style(Styles::nav_hint()),
        chunks[1],
    );

    if let Some(row) = dropdown_anchor {
        let matches = form.focused_matches(panel.options());
        if !matches.is_empty() {
            let top = chunks[0].y + row + 1;
            let height = (matches.len() as u16 + 2)
                .min(UiConstants::DROPDOWN_ROWS + 2)
                .min(chunks[0].bottom().saturating_sub(top));
            let area = Rect::new(chunks[0].x + 18, top, chunks[0].width.saturating_sub(20), height);
            render_dropdown(f, area, &matches, form.option_cursor);
        }
    }
}

fn render_dropdown(f: &mut Frame, area: Rect, matches: &[&SelectOption], cursor: usize) {
    if area.height < 3 {
        return;
    }
    let items: Vec<ListItem> = matches
        .iter()
        .map(|option| ListItem::new(format!("{}  #{}", option.name, option.id)))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Colors::SECONDARY))
                .title(format!(" {} matches ", matches.len())),
        )
        .style(Styles::panel_bg())
        .highlight_style(Styles::selected());
    let mut list_state = ListState::default().with_selected(Some(cursor));
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_edit_form(f: &mut Frame, edit: &EditState, tab: AdminTab) {
    let window = FloatingWindow::new(FloatingWindowConfig {
        title: format!("Edit {} #{}", tab, edit.id),
        width_percent: 70,
        height_percent: 80,
        min_height: 10,
        ..Default::default()
    });
    let lines: Vec<Line> = edit
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let focused = i == edit.focus;
            let value = edit.values.get(&column.key).cloned().unwrap_or_default();
            Line::from(vec![
                Span::styled(if focused { "> " } else { "  " }, Styles::focused()),
                Span::styled(
                    format!("{:<16}", column.label),
                    if focused { Styles::focused() } else { Styles::text_secondary() },
                ),
                Span::styled(
                    if focused { format!("{}_", value) } else { value },
                    Styles::text(),
                ),
            ])
        })
        .collect();
    window.render_lines(f, f.area(), &lines, Some("Enter saves · Esc cancels"));
}

/// Render the admin panel into `area`
pub fn render_admin(f: &mut Frame, area: Rect, panel: &AdminPanel, state: &AppState) {
    let table = panel.active_table();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    render_tabs(f, chunks[0], panel.active_tab());
    render_search_line(f, chunks[1], table, state);
    render_table(f, chunks[2], table, state);

    match table.mode() {
        TableMode::Adding => render_add_form(f, table, panel),
        TableMode::Editing(edit) => render_edit_form(f, edit, table.tab()),
        TableMode::ConfirmDelete { id, name } => super::dialogs::render_confirm_delete(f, *id, name),
        TableMode::Browse | TableMode::Search => {}
    }
}
