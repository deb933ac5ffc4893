use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::builders::collector::collect_source_files;
use crate::builders::patcher::{FilePatcher, PatchAction, PatchMode, PatchReport};
use crate::builders::storage::{BackupStore, SiblingFileBackup};
use crate::core::config::FixerConfig;

/// A file whose processing failed while the pass carried on.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a whole directory pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub check_only: bool,
    pub files_scanned: usize,
    pub already_compliant: usize,
    pub patched: Vec<PathBuf>,
    pub non_compliant: Vec<PathBuf>,
    pub recovered: Vec<PathBuf>,
    /// Leftover backups seen in check-only mode. They are left on disk.
    pub pending_backups: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    fn new(root: &Path, check_only: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            check_only,
            files_scanned: 0,
            already_compliant: 0,
            patched: Vec::new(),
            non_compliant: Vec::new(),
            recovered: Vec::new(),
            pending_backups: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, report: PatchReport) {
        if report.recovered_from_backup {
            if self.check_only {
                self.pending_backups.push(report.path.clone());
            } else {
                self.recovered.push(report.path.clone());
            }
        }
        match report.action {
            PatchAction::AlreadyCompliant => self.already_compliant += 1,
            PatchAction::Patched => self.patched.push(report.path),
            PatchAction::WouldPatch => self.non_compliant.push(report.path),
        }
    }

    /// No per-file failure and, in check-only mode, nothing left to patch.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.non_compliant.is_empty()
    }
}

/// Drives collection and patching over one directory tree, strictly in
/// collection order.
pub struct FixEngine {
    config: FixerConfig,
    patcher: FilePatcher,
}

impl FixEngine {
    pub fn new(config: FixerConfig, mode: PatchMode) -> Self {
        let store = Box::new(SiblingFileBackup::from_config(&config));
        Self::with_store(config, store, mode)
    }

    pub fn with_store(config: FixerConfig, store: Box<dyn BackupStore>, mode: PatchMode) -> Self {
        let patcher = FilePatcher::new(&config, store, mode);
        Self { config, patcher }
    }

    /// Runs the pass. Collection errors always abort. A per-file error aborts
    /// only when `fail_fast` is set; otherwise it is logged, recorded in the
    /// summary, and the next file is processed.
    pub fn run(&mut self, root: &Path) -> Result<RunSummary> {
        let files = collect_source_files(root, &self.config)
            .with_context(|| format!("Failed to collect source files under {}", root.display()))?;

        let check_only = self.patcher.mode() == PatchMode::CheckOnly;
        let mut summary = RunSummary::new(root, check_only);
        summary.files_scanned = files.len();
        info!(root = %root.display(), files = files.len(), check_only, "starting pass");

        for path in files {
            match self.patcher.patch(&path) {
                Ok(report) => {
                    debug!(path = %path.display(), action = %report.action, "processed");
                    summary.record(report);
                }
                Err(e) if self.config.fail_fast => {
                    return Err(e).with_context(|| format!("Failed to process {}", path.display()));
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "skipping file");
                    summary.failures.push(FileFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            patched = summary.patched.len(),
            non_compliant = summary.non_compliant.len(),
            recovered = summary.recovered.len(),
            pending_backups = summary.pending_backups.len(),
            failures = summary.failures.len(),
            "pass finished"
        );
        Ok(summary)
    }
}
