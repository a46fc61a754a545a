use clap::ArgMatches;

use crate::cli_context::CliContext;
use crate::client::UniversityDirectory;
use crate::formatting::print_universities;

pub async fn handle_universities(_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let context = CliContext::load()?;
    let client = context.anonymous_client()?;

    let universities = client.list_universities().await?;
    print_universities(&universities);

    Ok(())
}
