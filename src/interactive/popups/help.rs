use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::draw_hints;
use crate::interactive::app::{InteractiveApp, Screen};
use crate::interactive::layout::centered_popup;

const BOARD_KEYS: [(&str, &str); 11] = [
    ("j/k", "Move up/down"),
    ("n", "New request"),
    ("e/Enter", "Edit selected (yours only)"),
    ("d", "Delete selected (yours only)"),
    ("/", "Search"),
    ("m", "Toggle my requests"),
    ("r", "Refresh"),
    ("x", "Dismiss notifications"),
    ("L", "Log out"),
    ("?", "This help"),
    ("q", "Quit"),
];

const AUTH_KEYS: [(&str, &str); 7] = [
    ("Tab", "Next field"),
    ("Shift-Tab", "Previous field"),
    ("Enter", "Submit / open picker"),
    ("Ctrl+T", "Switch login / register"),
    ("Ctrl+F", "Forgot password"),
    ("F1", "This help"),
    ("Esc", "Quit"),
];

/// Draw the keyboard shortcuts for the current screen.
pub fn draw(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let keys: &[(&str, &str)] = match app.screen {
        Screen::Board => &BOARD_KEYS,
        Screen::Auth => &AUTH_KEYS,
    };

    let width: u16 = 50;
    let height: u16 = keys.len() as u16 + 4;
    let popup_area = centered_popup(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Keyboard Shortcuts ")
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", key), key_style),
                Span::styled(*desc, desc_style),
            ])
        })
        .collect();

    let content_area = Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), inner.height.saturating_sub(1));
    frame.render_widget(Paragraph::new(lines), content_area);

    draw_hints(frame, inner, "Press Esc to close");
}
