use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::core::config::FixerConfig;
use crate::core::error::{FixerError, Result};

/// Holds the pre-patch copy of a target file while it is being rewritten.
///
/// A pending backup at the start of a patch means the previous run stopped
/// between taking the backup and finishing the rewrite.
pub trait BackupStore {
    /// Looks up a backup left behind for `target`.
    ///
    /// # Arguments
    /// * `target`: The source file the backup belongs to.
    ///
    /// # Returns
    /// `Ok(Some(content))` when a backup exists, `Ok(None)` when it does not,
    /// and `FixerError::Read` when it exists but cannot be read.
    fn pending(&self, target: &Path) -> Result<Option<Vec<u8>>>;

    /// Persists a full copy of `content` for `target`. Must be durable
    /// before the caller touches the target.
    ///
    /// # Arguments
    /// * `target`: The source file about to be rewritten.
    /// * `content`: The bytes of `target` before the rewrite.
    ///
    /// # Returns
    /// `FixerError::Write` if the copy could not be written or synced.
    fn store(&mut self, target: &Path, content: &[u8]) -> Result<()>;

    /// Drops the backup for `target`. A missing backup is not an error.
    ///
    /// # Arguments
    /// * `target`: The source file whose backup is no longer needed.
    ///
    /// # Returns
    /// `FixerError::Cleanup` if an existing backup could not be removed.
    fn discard(&mut self, target: &Path) -> Result<()>;
}

/// Keeps each backup next to its target as `<target><suffix>`.
pub struct SiblingFileBackup {
    suffix: String,
}

impl SiblingFileBackup {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &FixerConfig) -> Self {
        Self::new(config.backup_suffix.clone())
    }

    pub fn backup_path(&self, target: &Path) -> PathBuf {
        let mut name = target.as_os_str().to_os_string();
        name.push(&self.suffix);
        PathBuf::from(name)
    }
}

impl BackupStore for SiblingFileBackup {
    fn pending(&self, target: &Path) -> Result<Option<Vec<u8>>> {
        let backup_path = self.backup_path(target);
        match fs::read(&backup_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FixerError::read(backup_path, e)),
        }
    }

    fn store(&mut self, target: &Path, content: &[u8]) -> Result<()> {
        let backup_path = self.backup_path(target);
        let mut file = File::create(&backup_path).map_err(|e| FixerError::write(&backup_path, e))?;
        file.write_all(content)
            .and_then(|()| file.sync_all())
            .map_err(|e| FixerError::write(&backup_path, e))?;
        Ok(())
    }

    fn discard(&mut self, target: &Path) -> Result<()> {
        let backup_path = self.backup_path(target);
        match fs::remove_file(&backup_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FixerError::Cleanup {
                path: backup_path,
                source,
            }),
        }
    }
}
