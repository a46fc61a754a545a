use chrono::{Local, NaiveDate};
use colored::*;

use super::utils::*;
use crate::models::{TeamRequest, University};

fn format_deadline(request: &TeamRequest, today: NaiveDate) -> ColoredString {
    let label = describe_deadline(request.end_date(), today);
    match request.end_date().map(|end| days_until(end, today)) {
        Some(d) if d < 0 => label.red().dimmed(),
        Some(d) if d <= 3 => label.yellow(),
        Some(_) => label.green(),
        None => label.dimmed(),
    }
}

fn format_owner(request: &TeamRequest, user_id: Option<&str>) -> ColoredString {
    let name = extract_first_name(&request.user_name);
    match user_id {
        Some(uid) if request.is_owned_by(uid) => format!("{} (you)", name).green().bold(),
        _ => name.normal(),
    }
}

/// Print a list of requests. `user_id` marks the caller's own requests.
pub fn print_requests(requests: &[&TeamRequest], format: &str, user_id: Option<&str>) {
    if requests.is_empty() && format != "json" {
        println!("{}", "No team requests found.".dimmed());
        return;
    }

    let today = Local::now().date_naive();
    match format {
        "json" => match serde_json::to_string_pretty(requests) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize requests: {}", e),
        },
        "table" => {
            println!("{}", "─".repeat(110).dimmed());
            println!(
                "{:<26} {:<28} {:<16} {:<12} {:<14} {:<12}",
                "ID".bold(),
                "Project".bold(),
                "Course".bold(),
                "Semester".bold(),
                "Owner".bold(),
                "Ends".bold()
            );
            println!("{}", "─".repeat(110).dimmed());

            for request in requests {
                println!(
                    "{:<26} {:<28} {:<16} {:<12} {:<14} {:<12}",
                    request.id.as_deref().unwrap_or("-").blue(),
                    truncate(&request.project_name, 28),
                    truncate(&request.course_name, 16).cyan(),
                    truncate(&request.semester, 12),
                    format_owner(request, user_id),
                    format_deadline(request, today)
                );
            }
            println!("{}", "─".repeat(110).dimmed());
        }
        _ => {
            for request in requests {
                println!(
                    "\n{} {} {}",
                    "▸".cyan(),
                    request.project_name.bold(),
                    format!("[{}]", request.id.as_deref().unwrap_or("-")).dimmed()
                );
                println!(
                    "  {}: {} | {}: {} | {}: {} | {}: {}",
                    "Course".dimmed(),
                    request.course_name.cyan(),
                    "Semester".dimmed(),
                    request.semester,
                    "By".dimmed(),
                    format_owner(request, user_id),
                    "Ends".dimmed(),
                    format_deadline(request, today)
                );
                let preview = first_line(&request.description);
                if !preview.is_empty() {
                    println!("  {}", truncate(preview, 90).dimmed());
                }
            }
            println!();
        }
    }
}

pub fn print_request(request: &TeamRequest) {
    let today = Local::now().date_naive();
    println!("\n{}", "═".repeat(80).blue());
    println!(
        "{} {}",
        request.id.as_deref().unwrap_or("(draft)").blue().bold(),
        request.project_name.bold()
    );
    println!("{}", "─".repeat(80).dimmed());
    println!("{}: {}", "Course".dimmed(), request.course_name.cyan());
    println!("{}: {}", "Semester".dimmed(), request.semester);
    println!("{}: {}", "Owner".dimmed(), request.user_name.green());
    println!(
        "{}: {} ({})",
        "Ends".dimmed(),
        request.end_time,
        format_deadline(request, today)
    );
    if !request.description.trim().is_empty() {
        println!("\n{}", "Description".bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}", request.description);
    }
    println!("{}", "═".repeat(80).blue());
}

pub fn print_universities(universities: &[University]) {
    if universities.is_empty() {
        println!("{}", "No universities found.".dimmed());
        return;
    }
    println!("{}", "Universities:".bold());
    for university in universities {
        println!("  {} {}", "•".cyan(), university.name);
    }
}
