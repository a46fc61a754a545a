use clap::ArgMatches;
use colored::*;

use super::{confirm, print_notices};
use crate::board::RequestBoard;
use crate::cli_context::CliContext;
use crate::error::{ErrorContext, TeammateError, TeammateResult};
use crate::formatting::{print_request, print_requests};
use crate::models::RequestField;

/// clap argument ids for the editable fields, in form order.
pub const FIELD_ARGS: [(&str, RequestField); 5] = [
    ("project", RequestField::ProjectName),
    ("course", RequestField::CourseName),
    ("semester", RequestField::Semester),
    ("description", RequestField::Description),
    ("end", RequestField::EndTime),
];

async fn open_board(context: &mut CliContext) -> TeammateResult<RequestBoard> {
    let session = context.require_session()?;
    let client = context.verified_client().context("Failed to create API client")?;
    let mut board = RequestBoard::new(client, session).with_reconcile(context.reconcile());
    board.load().await?;
    board.take_notices();
    Ok(board)
}

pub async fn handle_list_requests(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_list_requests_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_list_requests_impl(matches: &ArgMatches) -> TeammateResult<()> {
    let mut context = CliContext::load().context("Failed to load CLI context")?;
    let mut board = open_board(&mut context).await?;

    if let Some(query) = matches.get_one::<String>("search") {
        board.set_search_query(query.clone());
    }
    board.set_view_my_requests(matches.get_flag("mine"));

    let format = matches
        .get_one::<String>("format")
        .cloned()
        .or_else(|| context.config().default_format.clone())
        .unwrap_or_else(|| "simple".to_string());

    let visible = board.visible();
    print_requests(&visible, &format, Some(&board.session().user_id));
    if format != "json" && board.filter().is_active() {
        println!(
            "{}",
            format!("Showing {} of {} requests", visible.len(), board.requests().len()).dimmed()
        );
    }
    Ok(())
}

pub async fn handle_create_request(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_create_request_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_create_request_impl(matches: &ArgMatches) -> TeammateResult<()> {
    let mut context = CliContext::load().context("Failed to load CLI context")?;
    let mut board = open_board(&mut context).await?;

    board.open_create();
    apply_field_args(&mut board, matches);
    if board.draft().project_name.trim().is_empty() {
        return Err(TeammateError::InvalidInput("Project name is required".to_string()));
    }

    let result = board.submit().await;
    print_notices(board.take_notices());
    print_request(&result?);
    Ok(())
}

pub async fn handle_update_request(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_update_request_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_update_request_impl(matches: &ArgMatches) -> TeammateResult<()> {
    let mut context = CliContext::load().context("Failed to load CLI context")?;
    let id = matches
        .get_one::<String>("id")
        .ok_or_else(|| TeammateError::InvalidInput("Request ID is required".to_string()))?;
    let mut board = open_board(&mut context).await?;

    board.open_edit(id)?;
    if !apply_field_args(&mut board, matches) {
        return Err(TeammateError::InvalidInput(
            "Nothing to update. Pass at least one of --project, --course, --semester, --description, --end"
                .to_string(),
        ));
    }

    let result = board.submit().await;
    print_notices(board.take_notices());
    print_request(&result?);
    Ok(())
}

pub async fn handle_delete_request(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_delete_request_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_delete_request_impl(matches: &ArgMatches) -> TeammateResult<()> {
    let mut context = CliContext::load().context("Failed to load CLI context")?;
    let id = matches
        .get_one::<String>("id")
        .ok_or_else(|| TeammateError::InvalidInput("Request ID is required".to_string()))?;
    let mut board = open_board(&mut context).await?;

    let prompt = board.request_delete(id)?;
    let confirmed = matches.get_flag("yes") || confirm(prompt)?;

    let result = board.confirm_delete(confirmed).await;
    print_notices(board.take_notices());
    if !result? {
        println!("{}", "Cancelled.".dimmed());
    }
    Ok(())
}

/// Copy the field flags that were given into the board's draft. Returns whether any were.
fn apply_field_args(board: &mut RequestBoard, matches: &ArgMatches) -> bool {
    let mut any = false;
    for (arg, field) in FIELD_ARGS {
        if let Some(value) = matches.get_one::<String>(arg) {
            board.set_draft_field(field, value.clone());
            any = true;
        }
    }
    any
}
