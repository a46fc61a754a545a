use clap::ArgMatches;
use colored::*;

use super::{print_notices, prompt_line, prompt_secret};
use crate::auth::{AuthField, AuthGateway};
use crate::cli_context::CliContext;
use crate::error::{ErrorContext, TeammateError, TeammateResult};
use crate::models::UserType;

pub async fn handle_login(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_login_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_login_impl(matches: &ArgMatches) -> TeammateResult<()> {
    let mut context = CliContext::load().context("Failed to load CLI context")?;
    let client = context.anonymous_client()?;

    let email = match matches.get_one::<String>("email") {
        Some(email) => email.clone(),
        None => prompt_line("Email: ")?,
    };
    let password = match matches.get_one::<String>("password") {
        Some(password) => password.clone(),
        None => prompt_secret("Password: ")?,
    };

    let mut gateway = AuthGateway::new();
    gateway.set_field(AuthField::Email, email);
    gateway.set_field(AuthField::Password, password);

    let result = gateway.login(&client, context.session_store()).await;
    print_notices(gateway.take_notices());
    let session = result?;

    println!("{}: {}", "User ID".bold(), session.user_id);
    println!("{}: {}", "Session".bold(), context.session_store().path().display().to_string().dimmed());
    context.set_session(session);
    Ok(())
}

pub async fn handle_register(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_register_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_register_impl(matches: &ArgMatches) -> TeammateResult<()> {
    let context = CliContext::load().context("Failed to load CLI context")?;
    let client = context.anonymous_client()?;

    let user_type: UserType = matches
        .get_one::<String>("user-type")
        .ok_or_else(|| TeammateError::InvalidInput("User type is required".to_string()))?
        .parse()?;

    let mut gateway = if user_type.requires_university() {
        AuthGateway::mount(&client).await
    } else {
        AuthGateway::new()
    };
    gateway.toggle_form();
    gateway.set_user_type(user_type);

    for (arg, field) in [
        ("name", AuthField::Name),
        ("email", AuthField::Email),
        ("password", AuthField::Password),
        ("confirm-password", AuthField::ConfirmPassword),
    ] {
        if let Some(value) = matches.get_one::<String>(arg) {
            gateway.set_field(field, value.clone());
        }
    }
    if let Some(university) = matches.get_one::<String>("university") {
        if let Err(e) = gateway.select_university(university) {
            print_notices(gateway.take_notices());
            return Err(e);
        }
    }

    let result = gateway.register(&client).await;
    print_notices(gateway.take_notices());
    result?;

    println!("Run {} to sign in.", "teammate login".cyan());
    Ok(())
}

pub async fn handle_logout(_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let mut context = CliContext::load()?;
    if context.clear_session()? {
        println!("{} {}", "✅".green(), "Logged out.".green().bold());
    } else {
        println!("{}", "No active session.".dimmed());
    }
    Ok(())
}
