//! Output formatting: table or JSON.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Color only when stdout is a terminal and `NO_COLOR` is unset.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Render a list in the chosen format: a `Tabled` row per item, or the
/// serialized items themselves.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
    }
}

/// Render one item: `detail_fn` for tables, serde for JSON.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
    }
}

pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// `allowed` in green or `blocked` in red.
pub fn access_label(allowed: bool, color: bool) -> String {
    match (allowed, color) {
        (true, true) => "allowed".green().to_string(),
        (false, true) => "blocked".red().to_string(),
        (true, false) => "allowed".into(),
        (false, false) => "blocked".into(),
    }
}

/// Print a warning line to stderr.
pub fn warn(message: &str) {
    let mut stderr = io::stderr().lock();
    if io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        let _ = writeln!(stderr, "{} {message}", "warning:".yellow().bold());
    } else {
        let _ = writeln!(stderr, "warning: {message}");
    }
}
