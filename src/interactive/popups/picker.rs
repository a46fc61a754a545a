use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use super::draw_hints;
use crate::formatting::truncate;
use crate::interactive::app::{InteractiveApp, PickerKind, Popup};
use crate::interactive::layout::centered_popup;

/// Draw the user type or university picker of the registration form.
pub fn draw(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let Some(Popup::Picker(kind)) = app.popup else { return };

    let title = match kind {
        PickerKind::UserType => "User Type",
        PickerKind::University => "University",
    };
    let options = app.picker_options(kind);

    let width: u16 = 44;
    let height: u16 = (options.len() as u16 + 4).min(20);
    let popup_area = centered_popup(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let max_visible = inner.height.saturating_sub(1) as usize;
    let scroll_offset = if app.picker_index >= max_visible {
        app.picker_index - max_visible + 1
    } else {
        0
    };

    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(max_visible)
        .map(|(i, name)| {
            let style = if i == app.picker_index {
                Style::default()
                    .fg(Color::Rgb(0, 0, 0))
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let display = truncate(name, (width - 4) as usize);
            ListItem::new(Line::from(Span::styled(format!(" {} ", display), style)))
        })
        .collect();

    let list_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
    frame.render_widget(List::new(items), list_area);

    draw_hints(frame, inner, "\u{2191}/\u{2193} Navigate  Enter: Select  Esc: Cancel");
}
