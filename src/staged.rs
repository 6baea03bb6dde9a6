//! Staged-file gate: picks the staged files the lint-time checks cover.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ExtguardConfig;
use crate::error::{ExtguardError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expands one level of `{a,b}` alternation per group; `glob` has none.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some(close) = pattern[open..].find('}').map(|i| open + i) else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    pattern[open + 1..close]
        .split(',')
        .flat_map(|alt| expand_braces(&format!("{}{}{}", head, alt, tail)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct StagedScope {
    patterns: Vec<Pattern>,
}

impl StagedScope {
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self> {
        let mut patterns = Vec::new();
        for glob in globs {
            for expanded in expand_braces(glob.as_ref()) {
                let pattern = Pattern::new(&expanded).map_err(|e| {
                    ExtguardError::Config(format!("invalid staged glob '{}': {}", expanded, e))
                })?;
                patterns.push(pattern);
            }
        }
        Ok(Self { patterns })
    }

    pub fn from_config(config: &ExtguardConfig) -> Result<Self> {
        Self::new(&config.staged_scopes())
    }

    /// `rel` is relative to the project root.
    pub fn matches(&self, rel: &Path) -> bool {
        let rel = rel.to_string_lossy().replace('\\', "/");
        self.patterns
            .iter()
            .any(|p| p.matches_with(&rel, MATCH_OPTIONS))
    }

    /// Files under `root` that fall inside the scope and still exist.
    pub fn select<I>(&self, root: &Path, files: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        files
            .into_iter()
            .filter(|path| {
                let rel = path.strip_prefix(root).unwrap_or(path);
                let keep = self.matches(rel) && path.is_file();
                if !keep {
                    debug!(file = %rel.display(), "outside staged scope");
                }
                keep
            })
            .collect()
    }
}
