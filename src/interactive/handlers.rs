use super::app::{InteractiveApp, RepositoryFactory, Services};
use super::event::{Event, EventHandler};
use super::keys::map_key;
use crate::cli_context::CliContext;
use crate::client::{ApiClient, RequestRepository};
use crate::error::{TeammateError, TeammateResult};
use crate::logging::{log_debug, log_error, log_info, log_panic_info};
use crate::session::Session;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::env;
use std::io;
use std::process::Command;
use std::sync::Arc;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn build_services(context: &CliContext) -> TeammateResult<Services> {
    let anonymous = Arc::new(context.anonymous_client()?);
    let api_url = context.api_url().to_string();
    let repositories: RepositoryFactory = Box::new(move |session: &Session| {
        let client = ApiClient::new(api_url.clone(), session.token.as_deref())?;
        Ok(Arc::new(client) as Arc<dyn RequestRepository>)
    });

    Ok(Services {
        auth: anonymous.clone(),
        directory: anonymous,
        repositories,
        store: context.session_store().clone(),
        reconcile: context.reconcile(),
    })
}

pub async fn run_interactive_mode() -> Result<(), Box<dyn std::error::Error>> {
    log_info("Starting interactive mode");

    let context = CliContext::load()?;
    let services = build_services(&context)?;
    let session = context.session().cloned();

    // Leave the terminal usable if anything panics while the TUI owns it
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        log_panic_info(info);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    log_debug("Terminal initialized");

    let mut app = InteractiveApp::start(services, session).await;
    let result = run_loop(&mut terminal, &mut app).await;

    log_info("Exiting interactive mode");
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log_error(&format!("Interactive mode failed: {}", e));
    }
    result.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn run_loop(terminal: &mut Tui, app: &mut InteractiveApp) -> TeammateResult<()> {
    let events = EventHandler::new(250);

    loop {
        if app.pending_editor {
            let edited = launch_external_editor(terminal, &app.editor_seed())?;
            app.apply_editor_result(edited);
            events.drain();
        }

        terminal
            .draw(|f| super::ui::draw(f, app))
            .map_err(|e| TeammateError::TerminalError(e.to_string()))?;

        let event = events
            .recv()
            .map_err(|e| TeammateError::TerminalError(e.to_string()))?;
        match event {
            Event::Key(key) => {
                let action = map_key(key, app.screen, app.popup);
                app.handle_action(action).await;
            }
            Event::Resize => {}
            Event::Tick => app.on_tick(),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn find_editor() -> String {
    if let Ok(editor) = env::var("EDITOR").or_else(|_| env::var("VISUAL")) {
        return editor;
    }
    ["hx", "nano", "vim", "vi"]
        .iter()
        .find(|candidate| {
            Command::new("which")
                .arg(candidate)
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        })
        .map(|candidate| candidate.to_string())
        .unwrap_or_else(|| "nano".to_string())
}

/// Hand the terminal to `$EDITOR` for the description. `None` if the editor was quit without saving.
fn launch_external_editor(terminal: &mut Tui, content: &str) -> TeammateResult<Option<String>> {
    let temp_file = tempfile::Builder::new()
        .prefix("teammate-request-")
        .suffix(".md")
        .tempfile()?;
    std::fs::write(temp_file.path(), content)?;

    let editor = find_editor();
    log_debug(&format!("Launching editor {} on {}", editor, temp_file.path().display()));

    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    terminal.show_cursor()?;

    let status = Command::new(&editor).arg(temp_file.path()).status();

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    match status {
        Ok(status) if status.success() => {
            let edited = std::fs::read_to_string(temp_file.path())?;
            Ok(Some(edited.trim_end().to_string()))
        }
        Ok(_) => Ok(None),
        Err(e) => {
            log_error(&format!("Failed to launch editor '{}': {}", editor, e));
            Ok(None)
        }
    }
}
