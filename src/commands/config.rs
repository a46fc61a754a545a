use clap::ArgMatches;
use colored::*;

use crate::config::{config_path, get_api_url, load_config, save_config, ReconcileStrategy};
use crate::logging::get_log_file_path;

const FORMATS: [&str; 3] = ["simple", "table", "json"];

pub async fn handle_config(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config();
    let mut changed = false;

    if let Some(url) = matches.get_one::<String>("api-url") {
        config.api_url = Some(url.trim_end_matches('/').to_string());
        changed = true;
    }
    if let Some(strategy) = matches.get_one::<String>("reconcile") {
        config.reconcile = strategy.parse::<ReconcileStrategy>()?;
        changed = true;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        if !FORMATS.contains(&format.as_str()) {
            return Err(format!("Unknown format '{}'. Use simple, table or json", format).into());
        }
        config.default_format = Some(format.clone());
        changed = true;
    }

    if changed {
        save_config(&config)?;
        println!("{} {}", "✅".green(), "Configuration saved.".green().bold());
    }

    if matches.get_flag("show") || !changed {
        println!("{}: {}", "Config file".bold(), config_path()?.display().to_string().dimmed());
        println!("{}: {}", "API URL".bold(), get_api_url(&config));
        println!("{}: {}", "Reconcile".bold(), config.reconcile);
        println!(
            "{}: {}",
            "Default format".bold(),
            config.default_format.as_deref().unwrap_or("simple")
        );
        if let Some(log_file) = get_log_file_path() {
            println!("{}: {}", "Log file".bold(), log_file.display().to_string().dimmed());
        }
    }

    Ok(())
}
