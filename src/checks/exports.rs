//! Export Convention Checker.
//!
//! A convention file is one whose base name starts with the configured
//! prefix (`use`). Such a file must export a binding named after its stem
//! and must not rely on a default export.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Outcome, read_exports};
use crate::syntax::ExportSummary;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    pub file: PathBuf,
    pub is_convention_file: bool,
    pub has_named_export: bool,
    pub has_default_export: bool,
    pub outcome: Outcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Serialize, Debug, Default)]
pub struct CheckReport {
    pub verdicts: Vec<CheckVerdict>,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.verdicts.iter().any(|v| v.outcome == Outcome::Error)
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.verdicts
            .iter()
            .filter(|v| v.is_convention_file && v.outcome == outcome)
            .count()
    }

    pub fn convention_files(&self) -> impl Iterator<Item = &CheckVerdict> {
        self.verdicts.iter().filter(|v| v.is_convention_file)
    }
}

pub struct ExportConventionChecker {
    prefix: String,
}

impl ExportConventionChecker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn is_convention_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(self.prefix.as_str()))
    }

    pub fn check_file(&self, path: &Path) -> CheckVerdict {
        if !self.is_convention_file(path) {
            return CheckVerdict {
                file: path.to_path_buf(),
                is_convention_file: false,
                has_named_export: false,
                has_default_export: false,
                outcome: Outcome::Ok,
                message: "not a convention file, skipped".to_string(),
                hint: None,
            };
        }

        match read_exports(path) {
            Ok(summary) => self.judge(path, &summary),
            Err(e) => {
                debug!(error = %e, "export check could not read file");
                CheckVerdict {
                    file: path.to_path_buf(),
                    is_convention_file: true,
                    has_named_export: false,
                    has_default_export: false,
                    outcome: Outcome::Error,
                    message: e.to_string(),
                    hint: None,
                }
            }
        }
    }

    /// Applies the named-export rule to an already extracted summary.
    pub fn judge(&self, path: &Path, summary: &ExportSummary) -> CheckVerdict {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let has_named = summary.exports_name(stem);
        let has_default = summary.has_default;

        let (outcome, message, hint) = match (has_named, has_default) {
            (true, false) => (Outcome::Ok, "exports look good".to_string(), None),
            (true, true) => (
                Outcome::Warn,
                "has both named and default exports, standardize to the named export only"
                    .to_string(),
                Some(format!("remove `export default` and keep `export const {}`", stem)),
            ),
            (false, true) => (
                Outcome::Error,
                "must use a named export, not a default export".to_string(),
                Some(format!(
                    "change `export default {0}` to `export const {0} = ...`",
                    stem
                )),
            ),
            (false, false) if summary.named.is_empty() && !summary.reexports_all => (
                Outcome::Error,
                "no exports found".to_string(),
                None,
            ),
            (false, false) => (
                Outcome::Error,
                format!("no named export `{}` found", stem),
                Some(format!("export the module's main binding as `{}`", stem)),
            ),
        };

        CheckVerdict {
            file: path.to_path_buf(),
            is_convention_file: true,
            has_named_export: has_named,
            has_default_export: has_default,
            outcome,
            message,
            hint,
        }
    }

    pub fn check_files<'p, I>(&self, files: I) -> CheckReport
    where
        I: IntoIterator<Item = &'p Path>,
    {
        CheckReport {
            verdicts: files.into_iter().map(|f| self.check_file(f)).collect(),
        }
    }
}
