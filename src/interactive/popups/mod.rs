pub mod confirm;
pub mod help;
pub mod picker;
pub mod request_form;
pub mod text_input;

use ratatui::{layout::Rect, Frame};
use crate::interactive::app::{InteractiveApp, Popup};

/// Draw the active popup, if any. Draws on top of everything.
pub fn draw_popup(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let Some(popup) = app.popup else { return };

    match popup {
        Popup::Picker(_) => picker::draw(frame, area, app),
        Popup::Search => text_input::draw(frame, area, app),
        Popup::ConfirmDelete => confirm::draw(frame, area, app),
        Popup::RequestForm => request_form::draw(frame, area, app),
        Popup::Help => help::draw(frame, area, app),
    }
}

/// A single dimmed hint line on the last row of `inner`.
pub(crate) fn draw_hints(frame: &mut Frame, inner: Rect, hints: &str) {
    use ratatui::{style::{Color, Style}, text::{Line, Span}, widgets::Paragraph};

    let hints_area = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(1),
        inner.width,
        1,
    );
    let hints_widget = Paragraph::new(Line::from(Span::styled(
        hints.to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(hints_widget, hints_area);
}
