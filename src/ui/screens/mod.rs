pub(crate) mod finance;
pub(crate) mod quotes;
pub(crate) mod tasks;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// Bordered block with a dim bold title.
pub(crate) fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

/// Centered two-line hint shown in place of an empty list.
pub(crate) fn render_empty(f: &mut Frame, area: Rect, title: String, message: &str, hint: &str) {
    let msg = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), theme::dim_style())),
    ];
    f.render_widget(Paragraph::new(msg).centered().block(titled_block(title)), area);
}

/// Style for a table row given cursor position and zebra striping.
pub(crate) fn row_style(i: usize, cursor: usize) -> Style {
    if i == cursor {
        theme::selected_style()
    } else if i % 2 == 1 {
        theme::alt_row_style()
    } else {
        theme::normal_style()
    }
}
