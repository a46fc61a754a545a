use clap::ArgMatches;
use colored::*;

use crate::cli_context::CliContext;

pub async fn handle_whoami(_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let context = CliContext::load()?;
    let session = context.require_session()?;

    println!("Logged in as: {}", session.user_name.green().bold());
    println!("User ID: {}", session.user_id);
    println!("Backend: {}", context.api_url().dimmed());

    Ok(())
}
