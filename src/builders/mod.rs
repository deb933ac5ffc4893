// This file is the module declaration file for the `builders` module.
// It declares and makes public the sub-modules that make up the
// scan -> check -> patch pipeline and the pieces around it.

// `collector` module:
// Walks a directory tree and returns the source files to inspect, pruning
// excluded directories (`migrations` by default) with their whole subtree.
pub mod collector;

// `checker` module:
// Recognizes a PEP-0263 encoding declaration on the first two lines of a
// file. Works on raw bytes so files in any encoding can be inspected.
pub mod checker;

// `patcher` module:
// Inserts the declaration into non-compliant files, keeping a `#!` line
// first. Owns the backup -> rewrite -> drop-backup sequence and the recovery
// of backups left behind by an interrupted run.
pub mod patcher;

// `storage` module:
// Defines the `BackupStore` trait and the `SiblingFileBackup` implementation
// that keeps `<file>.checker` next to the file being rewritten.
pub mod storage;

// `validator` module:
// Checks a configuration before use, including that the declaration it
// would insert is itself recognized by the checker.
pub mod validator;

// `reporter` module:
// Renders the run summary for the terminal or as JSON, YAML or TOML.
pub mod reporter;

// `selftest` module:
// Built-in example scenarios executed in scratch directories before every run.
pub mod selftest;
