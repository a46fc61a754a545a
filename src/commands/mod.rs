pub mod auth;
pub mod config;
pub mod requests;
pub mod universities;
pub mod whoami;

use std::io::{self, BufRead, IsTerminal, Write};

use colored::*;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::{TeammateError, TeammateResult};
use crate::notice::{Notice, NoticeKind};

/// Print the notices a gateway or board raised while handling a command.
pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Success => println!("{} {}", "✅".green(), notice.message.green().bold()),
            NoticeKind::Info => println!("{} {}", "ℹ".blue(), notice.message),
            NoticeKind::Error => eprintln!("{} {}", "❌".red(), notice.message.red()),
        }
    }
}

/// Read one line from stdin after printing `prompt`.
pub fn prompt_line(prompt: &str) -> TeammateResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a password without echoing it. Piped input is read as a plain line.
pub fn prompt_secret(prompt: &str) -> TeammateResult<String> {
    if !io::stdin().is_terminal() {
        return prompt_line(prompt);
    }

    print!("{}", prompt);
    io::stdout().flush()?;
    enable_raw_mode()?;
    let typed = read_secret_keys(|| loop {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => return Ok(key),
            _ => continue,
        }
    });
    disable_raw_mode()?;
    println!();

    typed?.ok_or_else(|| TeammateError::InvalidInput("Password entry cancelled".to_string()))
}

/// Collect keys up to Enter. `None` when the user aborts with Esc or Ctrl+C.
fn read_secret_keys<F>(mut next_key: F) -> TeammateResult<Option<String>>
where
    F: FnMut() -> io::Result<KeyEvent>,
{
    let mut secret = String::new();
    loop {
        let key = next_key()?;
        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

/// Ask a yes/no question; anything but "y"/"yes" counts as no.
pub fn confirm(prompt: &str) -> TeammateResult<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", prompt))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(codes: Vec<KeyEvent>) -> impl FnMut() -> io::Result<KeyEvent> {
        let mut codes = codes.into_iter();
        move || {
            codes
                .next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more keys"))
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_secret_keys_edit_and_submit() {
        let typed = read_secret_keys(keys(vec![
            key(KeyCode::Char('p')),
            key(KeyCode::Char('x')),
            key(KeyCode::Backspace),
            key(KeyCode::Char('w')),
            key(KeyCode::Enter),
        ]))
        .unwrap();
        assert_eq!(typed.as_deref(), Some("pw"));
    }

    #[test]
    fn test_secret_keys_cancel() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(read_secret_keys(keys(vec![key(KeyCode::Char('a')), ctrl_c])).unwrap(), None);
        assert_eq!(read_secret_keys(keys(vec![key(KeyCode::Esc)])).unwrap(), None);
        assert!(read_secret_keys(keys(vec![key(KeyCode::Char('a'))])).is_err());
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
