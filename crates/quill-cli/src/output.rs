//! Output formatting for the CLI.

use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;
use quill_core::{ExtensionRecord, ScanReport, Workspace, WorkspaceFileEntry};
use serde::Serialize;
use std::fmt::Write;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Print output in the specified format.
pub fn print<T: Serialize + HumanDisplay + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", value.human_display()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Print structured data; human format falls back to YAML.
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Human | OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Print a table of extensions with dynamic column widths.
pub fn print_extension_list(records: &[&ExtensionRecord], format: OutputFormat) -> Result<()> {
    if !matches!(format, OutputFormat::Human) {
        return print_structured(records, format);
    }

    if records.is_empty() {
        println!("No extensions installed.");
        return Ok(());
    }

    let id_width = records.iter().map(|r| r.id.as_str().len()).max().unwrap_or(2).max(2);
    let version_width = records.iter().map(|r| r.version.len()).max().unwrap_or(7).max(7);

    println!(
        "{:<id_w$}  {:<version_w$}  {}",
        "ID",
        "VERSION",
        "STATE",
        id_w = id_width,
        version_w = version_width
    );
    println!("{}", "-".repeat(id_width + version_width + 12));

    for record in records {
        println!(
            "{:<id_w$}  {:<version_w$}  {}",
            record.id,
            record.version,
            enabled_label(record.enabled),
            id_w = id_width,
            version_w = version_width
        );
    }

    Ok(())
}

/// Print the indexed files of a workspace.
pub fn print_file_list(files: &[&WorkspaceFileEntry], format: OutputFormat) -> Result<()> {
    if !matches!(format, OutputFormat::Human) {
        return print_structured(files, format);
    }

    if files.is_empty() {
        println!("No files indexed.");
        return Ok(());
    }

    for file in files {
        println!("{:<9} {}", file.category, file.relative_path);
    }

    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) -> Result<()> {
    let body = serde_json::json!({ "status": "ok", "message": message });
    match format {
        OutputFormat::Human => println!("{}", style(message).green()),
        OutputFormat::Json => println!("{body}"),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&body)?),
    }
    Ok(())
}

/// Print a warning to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", style("warning:").yellow().bold());
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

impl HumanDisplay for ExtensionRecord {
    fn human_display(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "ID:        {}", self.id);
        let _ = writeln!(out, "Name:      {}", self.id.name());
        let _ = writeln!(out, "Publisher: {}", self.publisher());
        let _ = writeln!(out, "Version:   {}", self.version);
        let _ = writeln!(out, "State:     {}", enabled_label(self.enabled));
        let _ = write!(out, "Path:      {}", self.install_path.display());

        out
    }
}

impl HumanDisplay for ScanReport {
    fn human_display(&self) -> String {
        let mut out = self.to_string();

        for failure in &self.failures {
            let _ = write!(
                out,
                "\n  {} {}: {}",
                style("✗").red(),
                failure.path.display(),
                failure.reason
            );
        }

        out
    }
}

impl HumanDisplay for Workspace {
    fn human_display(&self) -> String {
        format!(
            "{} ({}) opened {}",
            self.name,
            self.root.display(),
            format_time(&self.opened_at)
        )
    }
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
