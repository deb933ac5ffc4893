use pep263_fixer::builders::checker;
use pep263_fixer::builders::collector::collect_source_files;
use pep263_fixer::builders::patcher::{FilePatcher, PatchAction, PatchMode};
use pep263_fixer::builders::storage::{BackupStore, SiblingFileBackup};
use pep263_fixer::core::config::FixerConfig;
use pep263_fixer::core::error::FixerError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pkg/migrations/deeper")).unwrap();
    fs::write(root.join("pkg/a.py"), "a = 1\n").unwrap();
    fs::write(root.join("pkg/migrations/x.py"), "x = 1\n").unwrap();
    fs::write(root.join("pkg/migrations/deeper/y.py"), "y = 1\n").unwrap();
    dir
}

fn patcher(config: &FixerConfig) -> FilePatcher {
    FilePatcher::new(
        config,
        Box::new(SiblingFileBackup::from_config(config)),
        PatchMode::Apply,
    )
}

#[test]
fn test_core_workflow() {
    let td = setup_tree();
    let root = td.path();
    let config = FixerConfig::default();

    // 1. Collect
    let files = collect_source_files(root, &config).unwrap();
    assert_eq!(files, vec![root.join("pkg/a.py")]);

    // 2. Check
    assert!(!checker::is_compliant(&files[0]).unwrap());

    // 3. Patch
    let mut patcher = patcher(&config);
    let report = patcher.patch(&files[0]).unwrap();
    assert_eq!(report.action, PatchAction::Patched);
    assert!(checker::is_compliant(&files[0]).unwrap());

    // 4. Excluded files were never touched
    assert_eq!(
        fs::read_to_string(root.join("pkg/migrations/x.py")).unwrap(),
        "x = 1\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("pkg/migrations/deeper/y.py")).unwrap(),
        "y = 1\n"
    );
}

#[test]
fn test_relative_path_is_invalid_argument() {
    let err = collect_source_files(Path::new("pkg"), &FixerConfig::default()).unwrap_err();
    assert!(matches!(err, FixerError::InvalidArgument { .. }));
    assert!(err.to_string().contains("must be absolute"));
}

#[test]
fn test_recovery_uses_backup_content_before_checking() {
    let td = tempfile::tempdir().unwrap();
    let target = td.path().join("mod.py");
    let config = FixerConfig::default();
    let mut store = SiblingFileBackup::from_config(&config);

    fs::write(&target, "# -*- coding: utf-8 -*-\npartially rewritten\n").unwrap();
    store.store(&target, b"pre-patch line 1\npre-patch line 2\n").unwrap();

    let report = patcher(&config).patch(&target).unwrap();

    // the compliant-looking target was discarded in favour of the backup
    assert!(report.recovered_from_backup);
    assert_eq!(report.action, PatchAction::Patched);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "# -*- coding: UTF-8 -*-\npre-patch line 1\npre-patch line 2\n"
    );
    assert!(store.pending(&target).unwrap().is_none());
}

#[test]
fn test_declaration_beyond_line_two_gets_a_new_one() {
    let td = tempfile::tempdir().unwrap();
    let target = td.path().join("late.py");
    let original = "\"\"\"Docstring.\"\"\"\n\n# -*- coding: utf-8 -*-\n";
    fs::write(&target, original).unwrap();

    patcher(&FixerConfig::default()).patch(&target).unwrap();

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        format!("# -*- coding: UTF-8 -*-\n{original}")
    );
}
