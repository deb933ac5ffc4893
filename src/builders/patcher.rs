use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::builders::checker;
use crate::builders::storage::BackupStore;
use crate::core::config::FixerConfig;
use crate::core::error::{FixerError, Result};

const DIRECTIVE_MARKER: &[u8] = b"#!";

/// Whether the patcher may write to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Restore leftover backups and insert missing declarations.
    Apply,
    /// Inspect only. Leftover backups are reported, never consumed.
    CheckOnly,
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchAction {
    AlreadyCompliant,
    Patched,
    /// Check-only mode found the file non-compliant.
    WouldPatch,
}

impl fmt::Display for PatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchAction::AlreadyCompliant => write!(f, "already-compliant"),
            PatchAction::Patched => write!(f, "patched"),
            PatchAction::WouldPatch => write!(f, "would-patch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub path: PathBuf,
    pub action: PatchAction,
    /// A backup from an interrupted run was found. In `Apply` mode the file
    /// was restored from it before being checked.
    pub recovered_from_backup: bool,
}

/// Makes single files compliant with a crash-safe two-phase write:
/// backup, rewrite, drop backup.
pub struct FilePatcher {
    declaration: Vec<u8>,
    store: Box<dyn BackupStore>,
    mode: PatchMode,
}

impl FilePatcher {
    pub fn new(config: &FixerConfig, store: Box<dyn BackupStore>, mode: PatchMode) -> Self {
        Self {
            declaration: config.declaration_line().into_bytes(),
            store,
            mode,
        }
    }

    pub fn mode(&self) -> PatchMode {
        self.mode
    }

    /// Ensures `path` declares an encoding on line 1 or 2.
    ///
    /// A leftover backup is restored first, so the check and any rewrite run
    /// against the content the interrupted run started from. A read failure
    /// on the target propagates before any backup is written; a failed
    /// commit leaves the backup in place for the next run.
    pub fn patch(&mut self, path: &Path) -> Result<PatchReport> {
        let pending = self.store.pending(path)?;
        let recovered_from_backup = pending.is_some();

        let content = match pending {
            Some(saved) => {
                println!("ℹ️  Backup file found for {}", path.display());
                if self.mode == PatchMode::Apply {
                    self.restore(path, &saved)?;
                } else {
                    warn!(path = %path.display(), "leftover backup not restored in check-only mode");
                }
                saved
            }
            None => fs::read(path).map_err(|e| FixerError::read(path, e))?,
        };

        let action = if checker::content_is_compliant(&content) {
            debug!(path = %path.display(), "already compliant");
            PatchAction::AlreadyCompliant
        } else {
            match self.mode {
                PatchMode::CheckOnly => PatchAction::WouldPatch,
                PatchMode::Apply => {
                    self.rewrite(path, &content)?;
                    PatchAction::Patched
                }
            }
        };

        Ok(PatchReport {
            path: path.to_path_buf(),
            action,
            recovered_from_backup,
        })
    }

    fn restore(&mut self, path: &Path, saved: &[u8]) -> Result<()> {
        println!("ℹ️  Restoring {} from its backup", path.display());
        fs::write(path, saved).map_err(|e| FixerError::write(path, e))?;
        self.store.discard(path)?;
        println!("✓ Recovered {}", path.display());
        info!(path = %path.display(), "recovered from backup");
        Ok(())
    }

    fn rewrite(&mut self, path: &Path, original: &[u8]) -> Result<()> {
        self.store.store(path, original)?;

        let patched = insert_declaration(original, &self.declaration);
        fs::write(path, patched).map_err(|e| FixerError::write(path, e))?;

        self.store.discard(path)?;
        info!(path = %path.display(), "inserted encoding declaration");
        Ok(())
    }
}

/// Builds the patched content. An interpreter directive stays on line 1 and
/// the declaration goes on line 2; otherwise the declaration leads.
pub fn insert_declaration(content: &[u8], declaration: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + declaration.len() + 1);

    if content.starts_with(DIRECTIVE_MARKER) {
        let split = content
            .iter()
            .position(|b| *b == b'\n')
            .map_or(content.len(), |i| i + 1);
        let (directive, rest) = content.split_at(split);
        out.extend_from_slice(directive);
        if !directive.ends_with(b"\n") {
            out.push(b'\n');
        }
        out.extend_from_slice(declaration);
        out.extend_from_slice(rest);
    } else {
        out.extend_from_slice(declaration);
        out.extend_from_slice(content);
    }

    out
}
