use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::core::config::FixerConfig;
use crate::core::error::{FixerError, Result};

/// Walks `root` and returns every file carrying the configured extension.
///
/// `root` must be absolute; a relative path is rejected before the
/// filesystem is touched. Directories whose final path segment equals
/// `config.excluded_dir` are pruned together with their subtree, the root
/// included. Entries are visited in file-name order so the result is stable
/// across platforms.
pub fn collect_source_files(root: &Path, config: &FixerConfig) -> Result<Vec<PathBuf>> {
    if !root.is_absolute() {
        return Err(FixerError::InvalidArgument {
            path: root.to_path_buf(),
        });
    }

    let suffix = format!(".{}", config.extension);
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, &config.excluded_dir));

    for entry in walker {
        let entry = entry?;
        if !is_regular_file(&entry) {
            continue;
        }
        // raw bytes: names in a legacy encoding are not valid UTF-8
        let matches_extension = entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(suffix.as_bytes());
        if matches_extension {
            trace!(path = %entry.path().display(), "collected");
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "collection finished");
    Ok(files)
}

/// Regular files, and symlinks that resolve to one. Directory links are
/// never descended into since the walker does not follow links.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Only directories are matched; a file that happens to share the excluded
/// name is kept.
fn is_excluded_dir(entry: &DirEntry, excluded: &str) -> bool {
    let excluded = entry.file_type().is_dir() && entry.file_name() == excluded;
    if excluded {
        debug!(path = %entry.path().display(), "skipping excluded directory");
    }
    excluded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "loren ipsum line\n").unwrap();
    }

    #[test]
    fn test_rejects_relative_path() {
        let result = collect_source_files(Path::new("relative/dir"), &FixerConfig::default());
        assert!(matches!(result, Err(FixerError::InvalidArgument { .. })));
    }

    #[test]
    fn test_collects_nested_sources_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a.py"));
        touch(&root.join("notes.txt"));
        touch(&root.join("pkg/b.py"));
        touch(&root.join("pkg/deep/c.py"));
        touch(&root.join("pkg/data.pyc"));

        let files = collect_source_files(root, &FixerConfig::default()).unwrap();
        assert_eq!(
            files,
            vec![
                root.join("a.py"),
                root.join("pkg/b.py"),
                root.join("pkg/deep/c.py"),
            ]
        );
    }

    #[test]
    fn test_prunes_excluded_directories() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("app/models.py"));
        touch(&root.join("app/migrations/0001_initial.py"));
        touch(&root.join("app/migrations/nested/x.py"));
        touch(&root.join("migrations/x.py"));

        let files = collect_source_files(root, &FixerConfig::default()).unwrap();
        assert_eq!(files, vec![root.join("app/models.py")]);
    }

    #[test]
    fn test_root_named_like_excluded_dir_yields_nothing() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("migrations");
        touch(&root.join("x.py"));

        let files = collect_source_files(&root, &FixerConfig::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_file_named_like_excluded_dir_is_not_special() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("migrations"));
        touch(&root.join("keep.py"));

        let files = collect_source_files(root, &FixerConfig::default()).unwrap();
        assert_eq!(files, vec![root.join("keep.py")]);
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("tool.pyw"));
        touch(&root.join("lib.py"));

        let config = FixerConfig {
            extension: "pyw".to_string(),
            ..FixerConfig::default()
        };
        let files = collect_source_files(root, &config).unwrap();
        assert_eq!(files, vec![root.join("tool.pyw")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collects_non_utf8_file_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let root = dir.path();
        let legacy = root.join(OsStr::from_bytes(b"caf\xe9.py"));
        touch(&legacy);
        touch(&root.join("ok.py"));

        let files = collect_source_files(root, &FixerConfig::default()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&legacy));
        assert!(files.contains(&root.join("ok.py")));
    }

    #[cfg(unix)]
    #[test]
    fn test_collects_file_symlinks_but_not_linked_directories() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("real.txt"));
        symlink(root.join("real.txt"), root.join("link.py")).unwrap();
        symlink(root.join("nowhere.txt"), root.join("dangling.py")).unwrap();
        touch(&outside.path().join("hidden.py"));
        symlink(outside.path(), root.join("linked_dir")).unwrap();

        let files = collect_source_files(root, &FixerConfig::default()).unwrap();
        assert_eq!(files, vec![root.join("link.py")]);
    }

    #[test]
    fn test_missing_root_is_walk_error() {
        let dir = tempdir().unwrap();
        let result = collect_source_files(&dir.path().join("absent"), &FixerConfig::default());
        assert!(matches!(result, Err(FixerError::Walk(_))));
    }
}
