//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Notifications from the view layer go to stderr.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};
use tourdesk_core::{Notification, NotificationLevel, Notifier, OrderStats};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled on stderr.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single item in the chosen format. Table output uses
/// `detail_fn`, a pre-formatted key/value block.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Page footer for table output.
pub fn page_footer(page: u32, total_pages: u32, total: u64) -> String {
    format!("page {page} of {} ({total} total)", total_pages.max(1))
}

/// Order counts line printed under `orders list`.
pub fn stats_footer(stats: &OrderStats) -> String {
    format!(
        "orders: {} total, {} pending, {} confirmed, {} completed, {} canceled",
        stats.total, stats.pending, stats.confirmed, stats.completed, stats.canceled
    )
}

// ── Notifications ────────────────────────────────────────────────────

/// Writes view notifications to stderr.
///
/// Errors are skipped: they come back as the command's `Err` and are
/// rendered by miette.
pub struct StderrNotifier {
    quiet: bool,
    color: bool,
}

impl StderrNotifier {
    pub fn new(quiet: bool, color: ColorMode) -> Self {
        Self {
            quiet,
            color: should_color(color),
        }
    }
}

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        if self.quiet || notification.level == NotificationLevel::Error {
            return;
        }
        let line = format_notification(&notification, self.color);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

fn format_notification(n: &Notification, color: bool) -> String {
    let text = n.message.as_str();
    let mark = match n.level {
        NotificationLevel::Success => "✓",
        NotificationLevel::Info => "•",
        NotificationLevel::Warning => "!",
        NotificationLevel::Error => "✗",
    };
    if !color {
        return format!("{mark} {text}");
    }
    match n.level {
        NotificationLevel::Success => format!("{} {text}", mark.green()),
        NotificationLevel::Info => format!("{} {text}", mark.cyan()),
        NotificationLevel::Warning => format!("{} {text}", mark.yellow()),
        NotificationLevel::Error => format!("{} {text}", mark.red()),
    }
}
