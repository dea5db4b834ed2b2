use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use super::{render_empty, row_style, titled_block};
use crate::currency::format_brl;
use crate::models::{Quote, QuoteStatus, Task};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_timestamp, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(task) = &app.quote_task else {
        render_empty(
            f,
            area,
            " Quotes ".into(),
            "No task selected",
            "Pick a task on the Tasks tab and press Enter",
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    render_task_header(f, chunks[0], task, &app.quotes);

    let title = format!(" Quotes for {} ({}) ", task.name, app.quotes.len());
    if app.quotes.is_empty() {
        render_empty(
            f,
            chunks[1],
            title,
            "No quotes for this task yet",
            "Add one with :quote <vendor> | <amount> [| <description>]",
        );
        return;
    }

    let header_cells = ["Vendor", "Description", "Amount", "Status", "Received"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .quotes
        .iter()
        .enumerate()
        .skip(app.quote_scroll)
        .take(chunks[1].height.saturating_sub(3) as usize)
        .map(|(i, quote)| {
            let status_cell = if i == app.quote_index {
                Cell::from(quote.status.label())
            } else {
                Cell::from(Span::styled(
                    quote.status.label(),
                    Style::default().fg(theme::quote_status_color(quote.status)),
                ))
            };
            Row::new(vec![
                Cell::from(truncate(&quote.vendor, 24)),
                Cell::from(truncate(&quote.description, 40)),
                Cell::from(format_brl(quote.amount)),
                status_cell,
                Cell::from(format_timestamp(quote.created_at)),
            ])
            .style(row_style(i, app.quote_index))
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(title));
    f.render_widget(table, chunks[1]);
}

fn render_task_header(f: &mut Frame, area: Rect, task: &Task, quotes: &[Quote]) {
    let approved: Decimal = quotes
        .iter()
        .filter(|q| q.status == QuoteStatus::Approved)
        .map(|q| q.amount)
        .sum();
    let cheapest = quotes.first().map(|q| format_brl(q.amount));

    let lines = vec![
        Line::from(vec![
            Span::styled(
                task.name.clone(),
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", task.description), theme::dim_style()),
        ]),
        Line::from(vec![
            Span::styled("Estimate: ", theme::dim_style()),
            Span::styled(format_brl(task.estimate), theme::normal_style()),
            Span::styled("   Cheapest: ", theme::dim_style()),
            Span::styled(cheapest.unwrap_or_else(|| "-".into()), theme::normal_style()),
            Span::styled("   Approved: ", theme::dim_style()),
            Span::styled(format_brl(approved), Style::default().fg(theme::GREEN)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(titled_block(format!(" {} ", task.status))),
        area,
    );
}
