use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};

use teammate_finder::commands::{auth, config, requests, universities, whoami};
use teammate_finder::interactive::run_interactive_mode;
use teammate_finder::logging::{init_logging, log_error, log_info};

fn field_args(command: Command, require_project: bool) -> Command {
    command
        .arg(
            Arg::new("project")
                .long("project")
                .short('p')
                .value_name("NAME")
                .help("Project name")
                .required(require_project)
        )
        .arg(
            Arg::new("course")
                .long("course")
                .short('c')
                .value_name("COURSE")
                .help("Course name")
        )
        .arg(
            Arg::new("semester")
                .long("semester")
                .short('s')
                .value_name("SEMESTER")
                .help("Semester, e.g. \"Fall 2024\"")
        )
        .arg(
            Arg::new("description")
                .long("description")
                .short('d')
                .value_name("TEXT")
                .help("What the team is looking for")
        )
        .arg(
            Arg::new("end")
                .long("end")
                .short('e')
                .value_name("DATE")
                .help("End date (YYYY-MM-DD)")
        )
}

fn build_cli() -> Command {
    Command::new("teammate")
        .about("Team-mate finder - find project partners from the command line")
        .version("1.0.0")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .short('e')
                        .value_name("EMAIL")
                        .help("Account email (prompted when omitted)")
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .short('p')
                        .value_name("PASSWORD")
                        .help("Account password (prompted when omitted)")
                )
        )
        .subcommand(
            Command::new("register")
                .about("Create a new account")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .value_name("NAME")
                        .required(true)
                        .help("Full name")
                )
                .arg(
                    Arg::new("email")
                        .long("email")
                        .short('e')
                        .value_name("EMAIL")
                        .required(true)
                        .help("Account email")
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .short('p')
                        .value_name("PASSWORD")
                        .required(true)
                        .help("Password")
                )
                .arg(
                    Arg::new("confirm-password")
                        .long("confirm-password")
                        .value_name("PASSWORD")
                        .required(true)
                        .help("Password again")
                )
                .arg(
                    Arg::new("user-type")
                        .long("user-type")
                        .short('t')
                        .value_name("TYPE")
                        .required(true)
                        .help("Student, Alumni or Industry")
                )
                .arg(
                    Arg::new("university")
                        .long("university")
                        .short('u')
                        .value_name("NAME")
                        .help("University (Student and Alumni only, see 'teammate universities')")
                )
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(Command::new("universities").about("List the universities offered at registration"))
        .subcommand(
            Command::new("requests")
                .about("Browse and manage team requests")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List team requests")
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .short('s')
                                .value_name("QUERY")
                                .help("Search project, course, semester and description")
                        )
                        .arg(
                            Arg::new("mine")
                                .long("mine")
                                .short('m')
                                .help("Only show my requests")
                                .action(ArgAction::SetTrue)
                        )
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .short('f')
                                .value_name("FORMAT")
                                .help("Output format: simple, table, json")
                        )
                )
                .subcommand(field_args(
                    Command::new("create").about("Post a new team request"),
                    true,
                ))
                .subcommand(field_args(
                    Command::new("update")
                        .about("Edit one of your requests")
                        .arg(
                            Arg::new("id")
                                .value_name("ID")
                                .help("Request ID")
                                .required(true)
                                .index(1)
                        ),
                    false,
                ))
                .subcommand(
                    Command::new("delete")
                        .about("Delete one of your requests")
                        .arg(
                            Arg::new("id")
                                .value_name("ID")
                                .help("Request ID")
                                .required(true)
                                .index(1)
                        )
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .short('y')
                                .help("Skip the confirmation prompt")
                                .action(ArgAction::SetTrue)
                        )
                )
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .arg(
                    Arg::new("api-url")
                        .long("api-url")
                        .value_name("URL")
                        .help("Backend base URL")
                )
                .arg(
                    Arg::new("reconcile")
                        .long("reconcile")
                        .value_name("STRATEGY")
                        .help("After changes: trust-response or refetch")
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_name("FORMAT")
                        .help("Default list format: simple, table, json")
                )
                .arg(
                    Arg::new("show")
                        .long("show")
                        .help("Show the current settings")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("interactive")
                .about("Open the terminal UI")
        )
}

async fn dispatch(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("login", sub_matches)) => auth::handle_login(sub_matches).await,
        Some(("register", sub_matches)) => auth::handle_register(sub_matches).await,
        Some(("logout", sub_matches)) => auth::handle_logout(sub_matches).await,
        Some(("whoami", sub_matches)) => whoami::handle_whoami(sub_matches).await,
        Some(("universities", sub_matches)) => universities::handle_universities(sub_matches).await,
        Some(("requests", sub_matches)) => match sub_matches.subcommand() {
            Some(("list", list_matches)) => requests::handle_list_requests(list_matches).await,
            Some(("create", create_matches)) => requests::handle_create_request(create_matches).await,
            Some(("update", update_matches)) => requests::handle_update_request(update_matches).await,
            Some(("delete", delete_matches)) => requests::handle_delete_request(delete_matches).await,
            _ => Err("Unknown requests subcommand. Use 'teammate requests --help' for available options.".into()),
        },
        Some(("config", sub_matches)) => config::handle_config(sub_matches).await,
        Some(("interactive", _)) => run_interactive_mode().await,
        _ => Err("Unknown command. Use 'teammate --help' for available commands.".into()),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Warning: could not set up logging: {}", e);
    }

    let matches = build_cli().get_matches();
    log_info(&format!("Running command: {:?}", matches.subcommand_name()));

    if let Err(e) = dispatch(&matches).await {
        log_error(&format!("Command failed: {}", e));
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_requests_list_flags() {
        let matches = build_cli()
            .try_get_matches_from(["teammate", "requests", "list", "--mine", "-s", "rust", "-f", "table"])
            .unwrap();
        let (_, requests) = matches.subcommand().unwrap();
        let (name, list) = requests.subcommand().unwrap();
        assert_eq!(name, "list");
        assert!(list.get_flag("mine"));
        assert_eq!(list.get_one::<String>("search").unwrap(), "rust");
        assert_eq!(list.get_one::<String>("format").unwrap(), "table");
    }

    #[test]
    fn test_create_requires_project() {
        assert!(build_cli()
            .try_get_matches_from(["teammate", "requests", "create", "--course", "CS101"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["teammate", "requests", "create", "-p", "Alpha"])
            .is_ok());
    }

    #[test]
    fn test_delete_takes_id_and_yes() {
        let matches = build_cli()
            .try_get_matches_from(["teammate", "requests", "delete", "abc123", "--yes"])
            .unwrap();
        let (_, requests) = matches.subcommand().unwrap();
        let (_, delete) = requests.subcommand().unwrap();
        assert_eq!(delete.get_one::<String>("id").unwrap(), "abc123");
        assert!(delete.get_flag("yes"));
    }
}
