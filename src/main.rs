//! Python 2 sources without a PEP-0263 declaration fail to import as soon as
//! they contain a single non-ASCII byte. This tool walks a project tree and
//! adds `# -*- coding: UTF-8 -*-` to every source that lacks one, keeping a
//! `#!` interpreter line first. Each rewrite goes through a `.checker`
//! backup, so an interrupted run is repaired by the next one.
use anyhow::Result;
use clap::{ArgAction, Parser};
use pep263_fixer::builders::patcher::PatchMode;
use pep263_fixer::builders::reporter::ReportFormat;
use pep263_fixer::core::config::{ConfigManager, ConfigOverrides};
use pep263_fixer::utils;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pep263-fixer", version)]
#[command(about = "Ensure Python sources declare their encoding (PEP-0263)")]
struct Cli {
    /// Absolute path of the directory tree to fix
    dir: Option<PathBuf>,

    /// Encoding name written into inserted declarations
    #[arg(long, value_name = "NAME")]
    coding: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only report files missing a declaration; exit 1 if any are found
    #[arg(long)]
    check: bool,

    /// Abort the pass on the first file that cannot be processed
    #[arg(long)]
    fail_fast: bool,

    /// Print a run summary in the given format
    #[arg(long, value_enum, value_name = "FORMAT")]
    report: Option<ReportFormat>,

    /// Do not run the built-in self-test before the pass
    #[arg(long)]
    skip_self_test: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity
    #[arg(short = 'q', action = ArgAction::Count)]
    quiet: u8,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    utils::init_tracing(cli.verbose, cli.quiet);

    let overrides = ConfigOverrides {
        coding: cli.coding,
        fail_fast: cli.fail_fast,
    };
    let config = ConfigManager::new(cli.config, overrides).resolve()?;

    if !cli.skip_self_test {
        utils::self_test(&config);
    }

    let Some(dir) = cli.dir else {
        utils::warn_missing_directory();
        return Ok(ExitCode::SUCCESS);
    };

    let mode = if cli.check {
        PatchMode::CheckOnly
    } else {
        PatchMode::Apply
    };
    let summary = utils::fix_directory(&dir, config, mode, cli.report)?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
