use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{render_empty, row_style, titled_block};
use crate::currency::format_brl;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_timestamp, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(5),    // Expenses
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_expenses(f, chunks[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let summary = &app.summary;
    let count = summary.expense_count;

    render_card(
        f,
        cards[0],
        "Budget",
        summary.budget.map(format_brl),
        theme::ACCENT,
        Some("set with :budget".into()),
    );
    render_card(
        f,
        cards[1],
        "Spent",
        Some(format_brl(summary.total_spent)),
        theme::RED,
        Some(format!("{count} expense{}", if count == 1 { "" } else { "s" })),
    );
    render_card(
        f,
        cards[2],
        "Balance",
        summary.balance().map(format_brl),
        if summary.is_over_budget() {
            theme::RED
        } else {
            theme::GREEN
        },
        summary.is_over_budget().then(|| "over budget".to_string()),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: Option<String>,
    color: Color,
    subtitle: Option<String>,
) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value.unwrap_or_else(|| "-".into()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(titled_block(format!(" {title} ")));
    f.render_widget(text, area);
}

fn render_expenses(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Expenses ({}) ", app.expenses.len());
    if app.expenses.is_empty() {
        render_empty(
            f,
            area,
            title,
            "No expenses recorded",
            "Record one with :expense <description> | <amount>",
        );
        return;
    }

    let header_cells = ["Date", "Description", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            Row::new(vec![
                Cell::from(format_timestamp(expense.created_at)),
                Cell::from(truncate(&expense.description, 48)),
                Cell::from(format_brl(expense.amount)),
            ])
            .style(row_style(i, app.expense_index))
        })
        .collect();

    let widths = [
        Constraint::Length(17),
        Constraint::Min(20),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(title));
    f.render_widget(table, area);
}
