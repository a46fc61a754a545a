use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{AuthInput, InteractiveApp, Screen};
use super::layout::{app_layout, board_layout, centered_popup};
use super::{notifications, popups};
use crate::auth::AuthMode;
use crate::board::RequestBoard;
use crate::formatting::{days_until, describe_deadline, first_line, truncate};
use crate::models::TeamRequest;

pub fn draw(frame: &mut Frame, app: &InteractiveApp) {
    let area = frame.size();
    let layout = app_layout(area, app.visible_notifications().count());

    draw_header(frame, layout.header, app);
    match app.screen {
        Screen::Auth => draw_auth(frame, layout.main, app),
        Screen::Board => {
            if let Some(board) = &app.board {
                draw_board(frame, layout.main, app, board);
            }
        }
    }
    notifications::draw(frame, layout.notifications, app);
    draw_footer(frame, layout.footer, app);

    popups::draw_popup(frame, area, app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let mut spans = vec![Span::styled(
        " Team-mate Finder ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    match (&app.screen, &app.board) {
        (Screen::Board, Some(board)) => {
            spans.push(Span::styled(
                format!(" {} ", board.session().user_name),
                Style::default().fg(Color::Green),
            ));
            if board.view_my_requests() {
                spans.push(Span::styled(" [my requests] ", Style::default().fg(Color::Yellow)));
            }
            if !board.search_query().is_empty() {
                spans.push(Span::styled(
                    format!(" search: \"{}\" ", board.search_query()),
                    Style::default().fg(Color::Magenta),
                ));
            }
        }
        _ => {
            let mode = match app.gateway.mode() {
                AuthMode::Login => " Sign in ",
                AuthMode::Register => " Create account ",
            };
            spans.push(Span::styled(mode, Style::default().fg(Color::Gray)));
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn draw_auth(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let inputs = app.auth_inputs();
    let form_area = centered_popup(60, inputs.len() as u16 + 6, area);

    let (title, color) = match app.gateway.mode() {
        AuthMode::Login => (" Login ", Color::Cyan),
        AuthMode::Register => (" Register ", Color::Green),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let fields = app.gateway.fields();
    let mut lines: Vec<Line> = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let is_active = i == app.auth_focus;
            let label_style = if is_active {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let value = match input {
                AuthInput::Name => fields.name.clone(),
                AuthInput::Email => fields.email.clone(),
                AuthInput::Password => "*".repeat(fields.password.chars().count()),
                AuthInput::ConfirmPassword => "*".repeat(fields.confirm_password.chars().count()),
                AuthInput::UserType => fields
                    .user_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "Select... (Enter)".to_string()),
                AuthInput::University if fields.university.is_empty() => {
                    if app.gateway.universities().is_empty() {
                        "<type a name>".to_string()
                    } else {
                        "Select... (Enter)".to_string()
                    }
                }
                AuthInput::University => fields.university.clone(),
            };
            Line::from(vec![
                Span::styled(if is_active { "\u{25b6} " } else { "  " }, label_style),
                Span::styled(format!("{:<12}", input.label()), label_style),
                Span::styled(truncate(&value, 40), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    let switch = match app.gateway.mode() {
        AuthMode::Login => "Ctrl+T: Create an account  Ctrl+F: Forgot password",
        AuthMode::Register => "Ctrl+T: Back to login",
    };
    lines.push(Line::from(Span::styled(switch, Style::default().fg(Color::DarkGray))));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &InteractiveApp, board: &RequestBoard) {
    let layout = board_layout(area);
    let visible = board.visible();
    let today = Local::now().date_naive();
    let user_id = board.session().user_id.as_str();

    let items: Vec<ListItem> = visible
        .iter()
        .map(|request| {
            let mine = request.is_owned_by(user_id);
            let deadline = describe_deadline(request.end_date(), today);
            let deadline_color = match request.end_date().map(|end| days_until(end, today)) {
                Some(d) if d < 0 => Color::DarkGray,
                Some(d) if d <= 3 => Color::Yellow,
                Some(_) => Color::Green,
                None => Color::DarkGray,
            };
            let width = layout.list.width.saturating_sub(6) as usize;

            let mut title = vec![Span::styled(
                truncate(&request.project_name, width.saturating_sub(6)),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if mine {
                title.push(Span::styled(" (you)", Style::default().fg(Color::Green)));
            }
            ListItem::new(vec![
                Line::from(title),
                Line::from(vec![
                    Span::styled(request.course_name.clone(), Style::default().fg(Color::Cyan)),
                    Span::styled(format!(" · {} · ", request.semester), Style::default().fg(Color::Gray)),
                    Span::styled(deadline, Style::default().fg(deadline_color)),
                ]),
                Line::from(Span::styled(
                    truncate(first_line(&request.description), width),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let title = format!(" Requests ({}/{}) ", visible.len(), board.requests().len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
        .highlight_symbol("\u{258c}");

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected_index));
    }
    frame.render_stateful_widget(list, layout.list, &mut state);

    if visible.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No team requests match. Press n to post one.",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center);
        let inner = Rect::new(layout.list.x + 1, layout.list.y + 2, layout.list.width.saturating_sub(2), 1);
        frame.render_widget(empty, inner);
    }

    if layout.detail.width > 0 {
        draw_detail(frame, layout.detail, app.selected_request(), user_id);
    }
}

fn draw_detail(frame: &mut Frame, area: Rect, request: Option<&TeamRequest>, user_id: &str) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let Some(request) = request else {
        frame.render_widget(block, area);
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            request.project_name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("Course:   ", label), Span::raw(request.course_name.clone())]),
        Line::from(vec![Span::styled("Semester: ", label), Span::raw(request.semester.clone())]),
        Line::from(vec![Span::styled("Owner:    ", label), Span::raw(request.user_name.clone())]),
        Line::from(vec![Span::styled("Ends:     ", label), Span::raw(request.end_time.clone())]),
        Line::from(""),
    ];
    lines.extend(request.description.lines().map(|line| Line::from(line.to_string())));
    if request.is_owned_by(user_id) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "e: edit  d: delete",
            Style::default().fg(Color::Yellow),
        )));
    }

    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &InteractiveApp) {
    let hints = match app.screen {
        Screen::Auth => "Tab: Next field  Enter: Submit  Ctrl+T: Switch form  F1: Help  Esc: Quit",
        Screen::Board => {
            // edit/delete only offered on your own requests
            let owned = app
                .board
                .as_ref()
                .zip(app.selected_request())
                .map(|(board, request)| board.can_modify(request))
                .unwrap_or(false);
            board_hints(owned)
        }
    };

    let footer = Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(footer, area);
}

fn board_hints(owned: bool) -> &'static str {
    if owned {
        "j/k: Move  n: New  e: Edit  d: Delete  /: Search  m: Mine  r: Refresh  L: Logout  ?: Help  q: Quit"
    } else {
        "j/k: Move  n: New  /: Search  m: Mine  r: Refresh  L: Logout  ?: Help  q: Quit"
    }
}
