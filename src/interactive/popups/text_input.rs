use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::draw_hints;
use crate::interactive::app::InteractiveApp;
use crate::interactive::layout::centered_popup;

/// Draw the search box. The board filters as the query is typed.
pub fn draw(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let Some(board) = &app.board else { return };

    let width: u16 = 60;
    let height: u16 = 5;
    let popup_area = centered_popup(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Search ({} matches) ", board.visible().len()))
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let input_line = Line::from(vec![
        Span::styled(board.search_query().to_string(), Style::default().fg(Color::White)),
        Span::styled(
            " ",
            Style::default()
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(input_line), Rect::new(inner.x, inner.y, inner.width, 1));

    draw_hints(frame, inner, "Enter: Keep  Esc: Clear");
}
