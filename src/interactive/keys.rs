use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::interactive::app::{Popup, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    NextField,
    PrevField,

    // Auth form
    ToggleAuthMode,
    ForgotPassword,

    // Board
    NewRequest,
    EditRequest,
    DeleteRequest,
    ToggleMine,
    Refresh,
    Search,
    Logout,

    // Text input
    TypeChar(char),
    Backspace,
    Confirm,
    Cancel,
    ExternalEditor,

    // General
    Help,
    Quit,
    DismissNotification,

    None,
}

pub fn map_key(key: KeyEvent, screen: Screen, popup: Option<Popup>) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if let Some(popup) = popup {
        return map_popup_key(key, popup);
    }
    match screen {
        Screen::Auth => map_auth_key(key),
        Screen::Board => map_board_key(key),
    }
}

// Letters are typed into the form, so auth shortcuts live on control keys.
fn map_auth_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('t') => Action::ToggleAuthMode,
            KeyCode::Char('f') => Action::ForgotPassword,
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::Down => Action::NextField,
        KeyCode::BackTab | KeyCode::Up => Action::PrevField,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::F(1) => Action::Help,
        KeyCode::Char(c) => Action::TypeChar(c),
        _ => Action::None,
    }
}

fn map_board_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('n') => Action::NewRequest,
        KeyCode::Char('e') | KeyCode::Enter => Action::EditRequest,
        KeyCode::Char('d') => Action::DeleteRequest,
        KeyCode::Char('m') => Action::ToggleMine,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('/') => Action::Search,
        KeyCode::Char('x') => Action::DismissNotification,
        KeyCode::Char('L') => Action::Logout,
        KeyCode::Char('?') => Action::Help,
        _ => Action::None,
    }
}

fn map_popup_key(key: KeyEvent, popup: Popup) -> Action {
    match popup {
        Popup::Search => match key.code {
            KeyCode::Enter => Action::Confirm,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) => Action::TypeChar(c),
            _ => Action::None,
        },
        Popup::RequestForm => match key.code {
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::ExternalEditor,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Tab | KeyCode::Down => Action::NextField,
            KeyCode::BackTab | KeyCode::Up => Action::PrevField,
            KeyCode::Enter => Action::Confirm,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) => Action::TypeChar(c),
            _ => Action::None,
        },
        Popup::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Action::Confirm,
            KeyCode::Char('n') | KeyCode::Esc => Action::Cancel,
            _ => Action::None,
        },
        Popup::Picker(_) => match key.code {
            KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
            KeyCode::Enter => Action::Confirm,
            KeyCode::Esc | KeyCode::Char('q') => Action::Cancel,
            _ => Action::None,
        },
        Popup::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => Action::Cancel,
            _ => Action::None,
        },
    }
}
