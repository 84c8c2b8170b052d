//! Identifier rules for projects, shots, and tasks.
//!
//! An identifier starts with an ASCII letter and continues with at least one
//! letter, digit, or underscore, e.g. `CG_0010` or `EP01_SC01_0010`. The
//! check is case-sensitive and never trims.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]+$").expect("valid regex"));

/// Which entity an identifier names. Only used to word validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Project,
    Shot,
    Task,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdentifierKind::Project => "project",
            IdentifierKind::Shot => "shot",
            IdentifierKind::Task => "task",
        };
        f.write_str(s)
    }
}

/// Whether `s` is usable as a project, shot, or task identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER_RE.is_match(s)
}

/// Validate an identifier, naming its kind in the error.
pub fn validate_identifier(kind: IdentifierKind, s: &str) -> Result<(), CoreError> {
    if is_valid_identifier(s) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("{kind} id '{s}' is not valid")))
    }
}

/// Reject an empty key component before any statement is issued.
pub fn require_key(name: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        Err(CoreError::Validation(format!("'{name}' not specified")))
    } else {
        Ok(())
    }
}

/// Dotted natural key used in log fields and not-found errors.
///
/// ```
/// use pipetrack_core::naming::natural_key;
///
/// assert_eq!(natural_key(&["test", "CG_0010", "fx_fire"]), "test.CG_0010.fx_fire");
/// ```
pub fn natural_key(parts: &[&str]) -> String {
    parts.join(".")
}

/// Natural key of a version, with the number zero-padded to three digits.
///
/// ```
/// use pipetrack_core::naming::version_key;
///
/// assert_eq!(version_key("test", "CG_0010", "fx_fire", 7), "test.CG_0010.fx_fire.v007");
/// ```
pub fn version_key(project: &str, shot: &str, task: &str, version: i32) -> String {
    format!("{project}.{shot}.{task}.v{version:03}")
}
