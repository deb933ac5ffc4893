use regex::bytes::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::core::error::{FixerError, Result};

/// PEP-0263 recognizer: a comment line carrying `coding:` or `coding=`
/// followed somewhere by a codec-like `<word>-<digits>` token.
///
/// Unicode mode is off so the pattern runs over raw bytes; a file that is
/// not valid UTF-8 is still inspected.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^#.*coding[=:].*\w+-\d+").expect("declaration pattern is valid")
});

/// Only the first two lines may carry the declaration.
const INSPECTED_LINES: usize = 2;

/// Checks whether a single line is a recognizable encoding declaration.
pub fn is_declaration(line: &[u8]) -> bool {
    DECLARATION.is_match(line)
}

/// Checks already-loaded file content for a declaration on line 1 or 2.
///
/// An empty buffer has zero lines and is never compliant.
pub fn content_is_compliant(content: &[u8]) -> bool {
    if content.is_empty() {
        return false;
    }
    content
        .split(|b| *b == b'\n')
        .take(INSPECTED_LINES)
        .any(is_declaration)
}

/// Reads `path` and reports whether it already declares an encoding.
pub fn is_compliant(path: &Path) -> Result<bool> {
    let content = fs::read(path).map_err(|e| FixerError::read(path, e))?;
    Ok(content_is_compliant(&content))
}
