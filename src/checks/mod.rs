//! Lint-time checks run on explicit file lists (usually staged files).

pub mod exports;
pub mod imports;

pub use exports::{CheckReport, CheckVerdict, ExportConventionChecker};
pub use imports::{ImportConsistencyChecker, ImportIssue, ImportReport, IssueKind};

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{ExtguardError, Result};
use crate::syntax::{self, ExportSummary};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ok,
    Warn,
    Error,
}

/// Reads and parses `path`, returning what it exports.
pub fn read_exports(path: &Path) -> Result<ExportSummary> {
    let source = fs::read_to_string(path).map_err(|e| ExtguardError::read(path, e))?;
    let tree = syntax::parse_file_source(path, &source)?;
    Ok(syntax::collect_exports(&tree, &source))
}
