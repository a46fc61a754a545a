use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::DELETE_CONFIRM_PROMPT;
use crate::formatting::truncate;
use crate::interactive::app::InteractiveApp;
use crate::interactive::layout::centered_popup;

/// Draw the delete confirmation dialog for the pending request.
pub fn draw(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let Some(board) = &app.board else { return };
    let Some(pending) = board.pending_delete() else { return };

    let project = board
        .find(pending)
        .map(|request| request.project_name.as_str())
        .unwrap_or(pending);

    let width: u16 = 52;
    let height: u16 = 7;
    let popup_area = centered_popup(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Delete Request ")
        .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            DELETE_CONFIRM_PROMPT,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(project, (width - 4) as usize),
            Style::default().fg(Color::Yellow),
        )),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(message, Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1)));

    let options_area = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(1),
        inner.width,
        1,
    );
    let options_line = Line::from(vec![
        Span::styled("[", Style::default().fg(Color::DarkGray)),
        Span::styled("Y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled("]es  ", Style::default().fg(Color::DarkGray)),
        Span::styled("[", Style::default().fg(Color::DarkGray)),
        Span::styled("N", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled("]o", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(options_line), options_area);
}
