use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;

use crate::core::engine::RunSummary;

/// Output formats accepted by `--report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Yaml,
    Toml,
}

/// Turns the outcome of a pass into text for stdout.
pub trait RunReporter {
    /// Renders a finished pass.
    ///
    /// # Arguments
    /// * `summary`: The summary returned by `FixEngine::run`.
    ///
    /// # Returns
    /// A `Result<String>` with the full report. Structured formats fail only
    /// when the summary cannot be serialized.
    fn render(&self, summary: &RunSummary) -> Result<String>;
}

/// Human-readable report for the terminal.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn section(&self, out: &mut String, icon: &str, title: &str, paths: &[std::path::PathBuf]) {
        if paths.is_empty() {
            return;
        }
        out.push_str(&format!("\n{icon} {title}:\n"));
        for path in paths {
            out.push_str(&format!("  └─ {}\n", path.display()));
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReporter for ConsoleReporter {
    fn render(&self, summary: &RunSummary) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "📊 PEP-0263 Report".cyan().bold()));
        out.push_str("==================\n");
        out.push_str(&format!("Root: {}\n", summary.root.display()));

        self.section(&mut out, "🟢", "Patched", &summary.patched);
        self.section(&mut out, "🟡", "Missing a declaration", &summary.non_compliant);
        self.section(&mut out, "♻️ ", "Recovered from backup", &summary.recovered);
        self.section(&mut out, "⏸️ ", "Backup pending (not restored)", &summary.pending_backups);

        if !summary.failures.is_empty() {
            out.push_str("\n🔴 Failed:\n");
            for failure in &summary.failures {
                out.push_str(&format!(
                    "  └─ {}: {}\n",
                    failure.path.display(),
                    failure.error.red()
                ));
            }
        }

        out.push_str("\n📈 Summary:\n");
        out.push_str(&format!("  Files scanned: {}\n", summary.files_scanned));
        out.push_str(&format!("  Already compliant: {}\n", summary.already_compliant));
        if summary.check_only {
            out.push_str(&format!("  Missing a declaration: {}\n", summary.non_compliant.len()));
        } else {
            out.push_str(&format!("  Patched: {}\n", summary.patched.len()));
        }
        if summary.check_only {
            out.push_str(&format!("  Pending backups: {}\n", summary.pending_backups.len()));
        } else {
            out.push_str(&format!("  Recovered: {}\n", summary.recovered.len()));
        }
        out.push_str(&format!("  Failed: {}\n", summary.failures.len()));

        Ok(out)
    }
}

/// Serializes the summary for tooling.
pub struct StructuredReporter {
    format: ReportFormat,
}

impl StructuredReporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }
}

impl RunReporter for StructuredReporter {
    fn render(&self, summary: &RunSummary) -> Result<String> {
        let content = match self.format {
            ReportFormat::Json => {
                serde_json::to_string_pretty(summary).context("Failed to serialize to JSON")?
            }
            ReportFormat::Yaml => {
                serde_yaml::to_string(summary).context("Failed to serialize to YAML")?
            }
            ReportFormat::Toml => {
                toml::to_string_pretty(summary).context("Failed to serialize to TOML")?
            }
            ReportFormat::Console => return ConsoleReporter::new().render(summary),
        };
        Ok(content)
    }
}

pub fn reporter_for(format: ReportFormat) -> Box<dyn RunReporter> {
    match format {
        ReportFormat::Console => Box::new(ConsoleReporter::new()),
        other => Box::new(StructuredReporter::new(other)),
    }
}
