//! Built-in example scenarios executed before every run.
//!
//! Each scenario works in its own scratch directory, so the self-test never
//! touches the tree being fixed. Failures are reported, never fatal.

use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::builders::checker;
use crate::builders::collector::collect_source_files;
use crate::builders::patcher::{FilePatcher, PatchAction, PatchMode};
use crate::builders::storage::SiblingFileBackup;
use crate::core::config::FixerConfig;

type Scenario = fn(&Path, &FixerConfig) -> Result<()>;

const SCENARIOS: &[(&str, Scenario)] = &[
    ("collector lists source files", collector_lists_sources),
    ("collector skips excluded directories", collector_skips_excluded),
    ("checker rejects plain text", checker_rejects_plain_text),
    ("checker accepts declaration on line 1", checker_accepts_first_line),
    ("checker accepts declaration after directive", checker_accepts_second_line),
    ("checker ignores line 3", checker_ignores_third_line),
    ("patcher inserts declaration", patcher_inserts_declaration),
    ("patcher keeps interpreter directive", patcher_keeps_directive),
    ("patcher is idempotent", patcher_is_idempotent),
    ("patcher recovers from backup", patcher_recovers),
];

#[derive(Debug, Default)]
pub struct SelfTestReport {
    pub passed: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl SelfTestReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Runs every scenario against `config` and collects the outcomes.
pub fn run_self_test(config: &FixerConfig) -> SelfTestReport {
    let mut report = SelfTestReport::default();

    for &(name, scenario) in SCENARIOS {
        let outcome = TempDir::new()
            .context("Failed to create scratch directory")
            .and_then(|scratch| scenario(scratch.path(), config));
        match outcome {
            Ok(()) => report.passed.push(name),
            Err(e) => {
                tracing::warn!(scenario = name, error = %format!("{e:#}"), "self-test failed");
                report.failed.push((name, format!("{e:#}")));
            }
        }
    }

    report
}

fn patcher(config: &FixerConfig) -> FilePatcher {
    FilePatcher::new(
        config,
        Box::new(SiblingFileBackup::from_config(config)),
        PatchMode::Apply,
    )
}

fn source_name(config: &FixerConfig) -> String {
    format!("test.{}", config.extension)
}

fn collector_lists_sources(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "loren ipsum line\nloren ipsum line\n")?;
    let files = collect_source_files(dir, config)?;
    ensure!(files == vec![path], "unexpected files: {files:?}");
    Ok(())
}

fn collector_skips_excluded(dir: &Path, config: &FixerConfig) -> Result<()> {
    let excluded = dir.join(&config.excluded_dir);
    fs::create_dir(&excluded)?;
    fs::write(excluded.join(source_name(config)), "x = 1\n")?;
    let files = collect_source_files(dir, config)?;
    ensure!(files.is_empty(), "excluded files were collected: {files:?}");
    Ok(())
}

fn checker_rejects_plain_text(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "loren ipsum line 1\nloren ipsum line 2\n")?;
    ensure!(!checker::is_compliant(&path)?, "plain text reported compliant");
    Ok(())
}

fn checker_accepts_first_line(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "# -*- coding: utf-8 -*-\ncontinua na segunda linha\n")?;
    ensure!(checker::is_compliant(&path)?, "line 1 declaration not detected");
    Ok(())
}

fn checker_accepts_second_line(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "#!/usr/bin/env python\n# -*- coding: UTF-8 -*-\n")?;
    ensure!(checker::is_compliant(&path)?, "line 2 declaration not detected");
    Ok(())
}

fn checker_ignores_third_line(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "one\ntwo\n# -*- coding: utf-8 -*-\n")?;
    ensure!(!checker::is_compliant(&path)?, "line 3 declaration was accepted");
    Ok(())
}

fn patcher_inserts_declaration(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "loren ipsum line\nloren ipsum line\n")?;
    let report = patcher(config).patch(&path)?;
    ensure!(report.action == PatchAction::Patched, "file was not patched");

    let expected = format!("{}loren ipsum line\nloren ipsum line\n", config.declaration_line());
    let actual = fs::read_to_string(&path)?;
    ensure!(actual == expected, "unexpected content: {actual:?}");
    ensure!(checker::is_compliant(&path)?, "patched file is not compliant");
    Ok(())
}

fn patcher_keeps_directive(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "#!/usr/bin/env python\nprint('ok')\n")?;
    patcher(config).patch(&path)?;

    let expected = format!(
        "#!/usr/bin/env python\n{}print('ok')\n",
        config.declaration_line()
    );
    let actual = fs::read_to_string(&path)?;
    ensure!(actual == expected, "unexpected content: {actual:?}");
    Ok(())
}

fn patcher_is_idempotent(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    fs::write(&path, "x = 1\n")?;
    let mut patcher = patcher(config);
    patcher.patch(&path)?;
    let once = fs::read(&path)?;
    let report = patcher.patch(&path)?;
    ensure!(
        report.action == PatchAction::AlreadyCompliant,
        "second pass patched again"
    );
    ensure!(fs::read(&path)? == once, "second pass changed the file");
    Ok(())
}

fn patcher_recovers(dir: &Path, config: &FixerConfig) -> Result<()> {
    let path = dir.join(source_name(config));
    let store = SiblingFileBackup::from_config(config);
    fs::write(&path, "half-written")?;
    fs::write(store.backup_path(&path), "original\n")?;

    let report = patcher(config).patch(&path)?;
    ensure!(report.recovered_from_backup, "backup was not used");

    let expected = format!("{}original\n", config.declaration_line());
    let actual = fs::read_to_string(&path)?;
    ensure!(actual == expected, "unexpected content: {actual:?}");
    ensure!(!store.backup_path(&path).exists(), "backup was left behind");
    Ok(())
}
