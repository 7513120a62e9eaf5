use crate::run::RunReport;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// How the discovered URLs are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One URL per line.
    #[default]
    Text,
    /// A single JSON document with run metadata.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a RunReport,
}

/// Render the run's results in the requested format.
pub fn render_report(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for url in &report.urls {
                out.push_str(url);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let document = JsonReport {
                generated_at: chrono::Utc::now().to_rfc3339(),
                report,
            };
            let mut out = serde_json::to_string_pretty(&document)
                .context("Failed to serialize report as JSON")?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Write rendered output to `path`, or to stdout when no path is given.
pub fn write_report(rendered: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))
        }
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}

/// Human-readable run summary for the terminal.
pub fn generate_summary(report: &RunReport) -> String {
    let stats = &report.stats;
    let mut summary = String::new();
    summary.push_str(&format!("{}\n", "# Summary:".bright_white().bold()));
    summary.push_str(&format!("  Seeds: {}\n", report.seeds.len()));
    summary.push_str(&format!("  Requests issued: {}\n", stats.requests));
    summary.push_str(&format!("  Pages handled: {}\n", stats.pages_handled));
    if stats.failed_requests > 0 {
        summary.push_str(&format!(
            "  Failed requests: {}\n",
            stats.failed_requests.to_string().yellow()
        ));
    }
    if stats.handler_timeouts > 0 {
        summary.push_str(&format!(
            "  Handler timeouts: {}\n",
            stats.handler_timeouts.to_string().yellow()
        ));
    }
    if stats.ceiling_reached {
        summary.push_str(&format!("  {}\n", "Request ceiling reached".yellow()));
    }
    summary.push_str(&format!(
        "  URLs discovered: {}\n",
        report.urls.len().to_string().green().bold()
    ));
    summary
}
