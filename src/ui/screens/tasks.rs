use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use super::{render_empty, row_style, titled_block};
use crate::currency::format_brl;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_timestamp, priority_stars, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let filter = app
        .task_query
        .status
        .map(|s| format!("[{s}] "))
        .unwrap_or_default();
    let title = format!(
        " Tasks ({}) {filter}by {} ",
        app.tasks.len(),
        app.task_query.order
    );

    if app.tasks.is_empty() {
        let message = if app.task_query.status.is_some() {
            "No tasks with this status"
        } else {
            "No tasks yet"
        };
        render_empty(
            f,
            area,
            title,
            message,
            "Add one with :task <name> | <description> | <priority> [| <estimate>]",
        );
        return;
    }

    let header_cells = ["Priority", "Task", "Description", "Status", "Estimate", "Created"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .tasks
        .iter()
        .enumerate()
        .skip(app.task_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, task)| {
            let status = Span::styled(
                task.status.label(),
                Style::default().fg(theme::task_status_color(task.status)),
            );
            let status_cell = if i == app.task_index {
                Cell::from(task.status.label())
            } else {
                Cell::from(status)
            };
            Row::new(vec![
                Cell::from(priority_stars(task.priority)),
                Cell::from(truncate(&task.name, 24)),
                Cell::from(truncate(&task.description, 40)),
                status_cell,
                Cell::from(format_brl(task.estimate)),
                Cell::from(format_timestamp(task.created_at)),
            ])
            .style(row_style(i, app.task_index))
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(24),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths).header(header).block(titled_block(title));
    f.render_widget(table, area);
}
