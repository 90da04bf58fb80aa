//! Results, comparison and details screens (steps 5-7)

use crate::app::AppState;
use crate::engine::LaptopResultItem;
use crate::questionnaire::{MIN_COMPARE, QuestionnaireController};
use crate::theme::{Styles, Theme, UiText};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

fn or_missing(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UiText::MISSING.to_string())
}

fn joined(values: &[String]) -> String {
    if values.is_empty() {
        UiText::MISSING.to_string()
    } else {
        values.join(", ")
    }
}

/// "45 million", or "-" when the laptop has no listing.
pub fn price_text(item: &LaptopResultItem) -> String {
    or_missing(item.price_million.map(|p| format!("{} million", p)))
}

fn ram_text(item: &LaptopResultItem) -> String {
    or_missing(item.specs.ram_gb.map(|gb| format!("{} GB", gb)))
}

/// Comparison table rows: label then one cell per compared laptop.
pub fn comparison_rows(items: &[&LaptopResultItem]) -> Vec<(&'static str, Vec<String>)> {
    let row = |label: &'static str, cell: &dyn Fn(&LaptopResultItem) -> String| {
        (label, items.iter().copied().map(cell).collect::<Vec<String>>())
    };
    vec![
        row("Model", &|item| item.name.clone()),
        row("Price", &price_text),
        row("CPU", &|item| or_missing(item.specs.cpu_name.clone())),
        row("RAM", &ram_text),
        row("GPU", &|item| or_missing(item.specs.gpu_name.clone())),
        row("Features", &|item| joined(&item.features)),
        row("Ports", &|item| joined(&item.ports)),
    ]
}

/// Details panel lines as label/value pairs.
pub fn detail_rows(item: &LaptopResultItem) -> Vec<(&'static str, String)> {
    vec![
        ("CPU", or_missing(item.specs.cpu_name.clone())),
        ("GPU", or_missing(item.specs.gpu_name.clone())),
        ("RAM", ram_text(item)),
        ("Storage", or_missing(item.specs.storage.clone())),
        ("Display", or_missing(item.specs.display.clone())),
        ("Ports", joined(&item.ports)),
        ("Price", price_text(item)),
    ]
}

fn score_badge(item: &LaptopResultItem) -> Span<'static> {
    Span::styled(format!(" {:>3}% ", item.score), Theme::score_style(item.band()))
}

/// Step 5: ranked list with compare marks
pub fn render_results(f: &mut Frame, area: Rect, controller: &QuestionnaireController, state: &AppState) {
    let results = controller.results();
    let marked = controller.state().compare.len();
    let title = format!(
        " Recommended laptops ({})  |  marked {}/{} to compare ",
        results.len(),
        marked,
        MIN_COMPARE
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Styles::border_active());

    if results.is_empty() {
        f.render_widget(
            Paragraph::new(UiText::NO_RESULTS)
                .style(Styles::text_muted())
                .block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row> = results
        .iter()
        .map(|item| {
            let mark = if controller.state().is_marked(item.id) {
                Span::styled("[x]", Styles::marked())
            } else {
                Span::styled("[ ]", Styles::text_muted())
            };
            Row::new(vec![
                Cell::from(mark),
                Cell::from(score_badge(item)),
                Cell::from(item.name.clone()),
                Cell::from(price_text(item)),
                Cell::from(or_missing(item.specs.cpu_name.clone())),
                Cell::from(or_missing(item.specs.gpu_name.clone())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Length(13),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(
        Row::new(vec!["", "Score", "Model", "Price", "CPU", "GPU"]).style(Styles::header()),
    )
    .column_spacing(1)
    .block(block)
    .row_highlight_style(Styles::selected())
    .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.cursor));
    f.render_stateful_widget(table, area, &mut table_state);
}

/// Step 6: marked laptops side by side
pub fn render_comparison(f: &mut Frame, area: Rect, controller: &QuestionnaireController) {
    let items = controller.compared_items();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Compare laptops ")
        .border_style(Styles::border_active());

    let header = std::iter::once(Cell::from(""))
        .chain(items.iter().map(|item| {
            Cell::from(Line::from(vec![
                score_badge(item),
                Span::raw(" "),
                Span::styled(item.name.clone(), Styles::title()),
            ]))
        }))
        .collect::<Vec<_>>();

    let rows: Vec<Row> = comparison_rows(&items)
        .into_iter()
        .map(|(label, cells)| {
            let height = cells
                .iter()
                .map(|c| c.len() / 30 + 1)
                .max()
                .unwrap_or(1)
                .min(4) as u16;
            Row::new(
                std::iter::once(Cell::from(Span::styled(label, Styles::focused())))
                    .chain(cells.into_iter().map(Cell::from)),
            )
            .height(height)
        })
        .collect();

    let mut widths = vec![Constraint::Length(10)];
    let share = 100 / u16::try_from(items.len().max(1)).unwrap_or(u16::MAX);
    widths.extend(items.iter().map(|_| Constraint::Percentage(share)));

    let table = Table::new(rows, widths)
        .header(Row::new(header).height(1))
        .column_spacing(2)
        .block(block);
    f.render_widget(table, area);
}

/// Step 7: one laptop in detail
pub fn render_details(f: &mut Frame, area: Rect, controller: &QuestionnaireController) {
    let Some(item) = controller.active_item() else {
        f.render_widget(
            Paragraph::new("This laptop is no longer in the results.")
                .style(Styles::text_muted())
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let mut title = vec![score_badge(item), Span::raw("  "), Span::styled(item.name.clone(), Styles::title())];
    if let Some(desc) = &item.desc {
        title.push(Span::styled(format!("  {}", desc), Styles::text_muted()));
    }
    f.render_widget(
        Paragraph::new(Line::from(title)).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let lines: Vec<Line> = detail_rows(item)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<10}", label), Styles::focused()),
                Span::styled(value, Styles::text()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Specifications ")),
        chunks[1],
    );
}
