use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::Suffix;
use super::specifier::final_segment;
use crate::config::ExtguardConfig;
use crate::error::{ExtguardError, Result};

static MODULE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$-]*$").unwrap());

/// A module that must always be imported with an explicit suffix.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub specifier_prefix: String,
    pub module_name: String,
    pub required_suffix: Suffix,
}

impl PathRule {
    pub fn new(prefix: impl Into<String>, module: impl Into<String>, suffix: Suffix) -> Self {
        Self {
            specifier_prefix: prefix.into(),
            module_name: module.into(),
            required_suffix: suffix,
        }
    }

    /// The specifier every import of this module should use.
    pub fn canonical_specifier(&self) -> String {
        format!(
            "{}{}.{}",
            self.specifier_prefix, self.module_name, self.required_suffix
        )
    }
}

/// Immutable set of [`PathRule`]s, keyed by prefix then module name.
///
/// Built once per process and handed to every component by reference.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    by_prefix: BTreeMap<String, BTreeMap<String, PathRule>>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// Literal modules from the configuration plus, when enabled, every
    /// `.js`/`.jsx` file sitting directly in the hooks directory.
    pub fn from_config(config: &ExtguardConfig, project_root: &Path) -> Result<Self> {
        let prefix = config.hooks_prefix();
        let mut builder = Self::builder();

        for name in &config.explicit_modules {
            builder.insert(PathRule::new(&prefix, name, config.primary_suffix))?;
        }

        if config.discover_hooks {
            let hooks_dir = config.hooks_dir_path(project_root);
            match fs::read_dir(&hooks_dir) {
                Ok(entries) => {
                    let mut found: Vec<_> = entries
                        .flatten()
                        .map(|e| e.path())
                        .filter(|p| p.is_file())
                        .collect();
                    found.sort();

                    for path in found {
                        let Some(suffix) = path
                            .extension()
                            .and_then(|e| e.to_str())
                            .and_then(Suffix::from_extension)
                        else {
                            continue;
                        };
                        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                            continue;
                        };
                        if !MODULE_NAME_RE.is_match(stem) {
                            debug!(file = %path.display(), "skipping hook file with non-module name");
                            continue;
                        }
                        // A file on disk never overrides an existing pin: the
                        // literal list wins, then the first file in sort order.
                        if let Some(pinned) = builder.pinned(&prefix, stem) {
                            if pinned != suffix {
                                warn!(
                                    file = %path.display(),
                                    pinned = %pinned,
                                    "hook file disagrees with an existing pin, keeping the pin"
                                );
                            }
                            continue;
                        }
                        builder.insert(PathRule::new(&prefix, stem, suffix))?;
                    }
                }
                Err(e) => {
                    warn!(dir = %hooks_dir.display(), error = %e, "hooks directory not readable, discovery skipped");
                }
            }
        }

        Ok(builder.build())
    }

    /// Rule whose prefix starts `specifier` and whose module name equals
    /// the specifier's final segment.
    pub fn lookup(&self, specifier: &str) -> Option<&PathRule> {
        let module = final_segment(specifier);
        self.by_prefix
            .iter()
            .filter(|(prefix, _)| specifier.starts_with(prefix.as_str()))
            .find_map(|(_, modules)| modules.get(module))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathRule> {
        self.by_prefix.values().flat_map(|m| m.values())
    }

    pub fn len(&self) -> usize {
        self.by_prefix.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    by_prefix: BTreeMap<String, BTreeMap<String, PathRule>>,
}

impl RuleTableBuilder {
    /// Re-inserting an identical rule is a no-op; pinning the same module to
    /// a different suffix is a [`ExtguardError::DuplicateRule`].
    pub fn insert(&mut self, rule: PathRule) -> Result<&mut Self> {
        if !MODULE_NAME_RE.is_match(&rule.module_name) {
            return Err(ExtguardError::InvalidModuleName {
                name: rule.module_name,
            });
        }
        if !rule.specifier_prefix.ends_with('/') {
            return Err(ExtguardError::Config(format!(
                "specifier prefix '{}' must end with '/'",
                rule.specifier_prefix
            )));
        }

        let modules = self
            .by_prefix
            .entry(rule.specifier_prefix.clone())
            .or_default();

        match modules.get(&rule.module_name) {
            Some(existing) if existing.required_suffix == rule.required_suffix => {}
            Some(existing) => {
                return Err(ExtguardError::DuplicateRule {
                    prefix: rule.specifier_prefix,
                    module: rule.module_name,
                    existing: existing.required_suffix,
                    requested: rule.required_suffix,
                });
            }
            None => {
                modules.insert(rule.module_name.clone(), rule);
            }
        }
        Ok(self)
    }

    /// Suffix already pinned for `module` under `prefix`, if any.
    pub fn pinned(&self, prefix: &str, module: &str) -> Option<Suffix> {
        self.by_prefix
            .get(prefix)
            .and_then(|modules| modules.get(module))
            .map(|rule| rule.required_suffix)
    }

    pub fn build(self) -> RuleTable {
        RuleTable {
            by_prefix: self.by_prefix,
        }
    }
}
