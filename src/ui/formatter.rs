//! Pure formatting functions for UI output.
//!
//! Everything the release prints goes through here. Styling comes from
//! `console`, which drops colors when the stream is not a terminal. The
//! `format_*` functions build the styled line, `display_*` print it.

use console::style;

use crate::cli::orchestration::ReleaseEvent;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_command(command_line: &str) -> String {
    format!("  {} {}", style("$").dim(), style(command_line).cyan())
}

/// Indent git's own push output under the release progress.
pub fn format_remote_report(report: &str) -> String {
    report
        .lines()
        .map(|line| format!("    {}", style(line).dim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a progress event from the release sequence.
///
/// Completed steps render as successes, stage changes and previews as
/// status lines.
pub fn format_event(event: &ReleaseEvent) -> String {
    match event {
        ReleaseEvent::RemoteReport(report) => format_remote_report(report),
        event if event.is_completion() => format_success(&event.to_string()),
        event => format_status(&event.to_string()),
    }
}

pub fn format_summary(summary: &str, dry_run: bool) -> String {
    if dry_run {
        format!("\n{} {}\n", style("(dry run)").yellow(), summary)
    } else {
        format!("\n{} {}\n", style("✓").green().bold(), summary)
    }
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{}", format_success(message));
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{}", format_status(message));
}

/// Echo a command line about to be executed.
pub fn display_command(command_line: &str) {
    println!("{}", format_command(command_line));
}

pub fn display_event(event: &ReleaseEvent) {
    println!("{}", format_event(event));
}

/// Final line of a successful run.
pub fn display_summary(summary: &str, dry_run: bool) {
    println!("{}", format_summary(summary, dry_run));
}
