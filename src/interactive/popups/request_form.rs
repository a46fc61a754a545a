use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::draw_hints;
use crate::formatting::{first_line, truncate};
use crate::interactive::app::InteractiveApp;
use crate::interactive::layout::centered_popup;
use crate::models::RequestField;

/// Draw the create/edit request form.
pub fn draw(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let Some(board) = &app.board else { return };

    let width: u16 = 70;
    let height: u16 = 11;
    let popup_area = centered_popup(width, height, area);

    frame.render_widget(Clear, popup_area);

    let (title, color) = if app.is_editing() {
        (" Edit Request ", Color::Yellow)
    } else {
        (" New Request ", Color::Green)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let draft = board.draft();
    let active = app.active_form_field();
    let max_value_width = (inner.width as usize).saturating_sub(16);

    for (i, field) in RequestField::ALL.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.y + inner.height.saturating_sub(2) {
            break;
        }

        let is_active = *field == active;
        let label_style = if is_active {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let raw = draft.field(*field);
        let mut spans = vec![
            Span::styled(if is_active { "\u{25b6} " } else { "  " }, label_style),
            Span::styled(format!("{:<14}", field.label()), label_style),
        ];
        if raw.is_empty() && !is_active {
            spans.push(Span::styled(placeholder(*field), Style::default().fg(Color::DarkGray)));
        } else {
            let shown = match field {
                RequestField::Description if raw.contains('\n') => format!("{} (…)", first_line(raw)),
                _ => raw.to_string(),
            };
            let value_style = if is_active {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(truncate(&shown, max_value_width), value_style));
            if is_active {
                spans.push(Span::styled(" ", Style::default().bg(Color::White)));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), Rect::new(inner.x, y, inner.width, 1));
    }

    draw_hints(frame, inner, "Tab: Next  Enter: Save  Ctrl+E: Edit description  Esc: Cancel");
}

fn placeholder(field: RequestField) -> &'static str {
    match field {
        RequestField::ProjectName => "<project name>",
        RequestField::CourseName => "<course>",
        RequestField::Semester => "<e.g. Fall 2024>",
        RequestField::Description => "<who are you looking for?>",
        RequestField::EndTime => "<YYYY-MM-DD>",
    }
}
