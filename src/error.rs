//! Error types shared by every enforcement point.
//!
//! Per-file errors (`FileRead`, `FileWrite`, `Parse`) are collected by the
//! batch drivers and never abort a run. Configuration errors are fatal.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rules::Suffix;

pub type Result<T> = std::result::Result<T, ExtguardError>;

#[derive(Debug, Error)]
pub enum ExtguardError {
    /// A source file could not be read; the file is skipped.
    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Apply mode could not write the rewritten file back.
    #[error("cannot write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No candidate suffix resolved for an alias specifier.
    #[error("cannot resolve '{specifier}'{}", importer_note(importer.as_deref()))]
    UnresolvedModule {
        specifier: String,
        importer: Option<PathBuf>,
    },

    #[error("module '{module}' under '{prefix}' is already pinned to .{existing}, cannot pin it to .{requested}")]
    DuplicateRule {
        prefix: String,
        module: String,
        existing: Suffix,
        requested: Suffix,
    },

    #[error("'{name}' is not a valid module name")]
    InvalidModuleName { name: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("git: {0}")]
    Git(String),
}

impl ExtguardError {
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A per-file error recorded by a batch run.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ExtguardError,
}

fn importer_note(importer: Option<&Path>) -> String {
    importer
        .map(|p| format!(" (imported from {})", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_message_mentions_importer() {
        let err = ExtguardError::UnresolvedModule {
            specifier: "@/hooks/useFoo".into(),
            importer: Some(PathBuf::from("src/App.jsx")),
        };
        assert_eq!(
            err.to_string(),
            "cannot resolve '@/hooks/useFoo' (imported from src/App.jsx)"
        );
    }

    #[test]
    fn read_error_names_the_file() {
        let err = ExtguardError::read(
            Path::new("a.js"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.to_string().starts_with("cannot read a.js"));
    }
}
