use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::builders::patcher::PatchMode;
use crate::builders::reporter::{ReportFormat, reporter_for};
use crate::builders::selftest::{SelfTestReport, run_self_test};
use crate::core::config::FixerConfig;
use crate::core::engine::{FixEngine, RunSummary};

pub const MISSING_DIRECTORY_WARNING: &str =
    "Warning: no absolute directory path given, only the self-test was run.";

/// Maps `-v`/`-q` counts onto a default level; `RUST_LOG` still wins.
/// Logs go to stderr so stdout stays reserved for status lines and reports.
pub fn init_tracing(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-1 => LevelFilter::ERROR,
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // Ignore error if a subscriber is already installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

pub fn self_test(config: &FixerConfig) -> SelfTestReport {
    let report = run_self_test(config);
    print_self_test(&report);
    report
}

fn print_self_test(report: &SelfTestReport) {
    if report.is_success() {
        println!(
            "{} Self-test: {}/{} scenarios passed",
            "✓".green(),
            report.passed.len(),
            report.total()
        );
        return;
    }

    println!(
        "{} Self-test: {}/{} scenarios passed",
        "⚠️ ".yellow(),
        report.passed.len(),
        report.total()
    );
    for (name, error) in &report.failed {
        eprintln!("  ✗ {name}: {}", error.red());
    }
}

pub fn warn_missing_directory() {
    println!("{MISSING_DIRECTORY_WARNING}");
}

/// Runs a full pass over `root` and prints the requested report.
pub fn fix_directory(
    root: &Path,
    config: FixerConfig,
    mode: PatchMode,
    report: Option<ReportFormat>,
) -> Result<RunSummary> {
    let mut engine = FixEngine::new(config, mode);
    let summary = engine.run(root)?;

    if let Some(format) = report {
        let rendered = reporter_for(format).render(&summary)?;
        print!("{rendered}");
        if !rendered.ends_with('\n') {
            println!();
        }
    }
    if summary.check_only && !summary.non_compliant.is_empty() && report.is_none() {
        for path in &summary.non_compliant {
            println!("🟡 Missing encoding declaration: {}", path.display());
        }
    }
    if report.is_none() {
        for path in &summary.pending_backups {
            println!("⏸️  Backup left in place (check mode): {}", path.display());
        }
    }
    if !summary.failures.is_empty() && report.is_none() {
        println!(
            "{} {} file(s) could not be processed",
            "⚠️ ".yellow(),
            summary.failures.len()
        );
    }

    Ok(summary)
}
