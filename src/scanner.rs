//! Import Scanner: candidate files and the import statements inside them.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ExtguardConfig;
use crate::error::{ExtguardError, Result};
use crate::files;
use crate::rules::specifier;
use crate::syntax;

/// One import statement, or `export ... from` re-export, found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub source_file: PathBuf,
    pub raw_statement: String,
    pub specifier: String,
    pub named_bindings: Vec<String>,
    pub default_binding: Option<String>,
    pub namespace_binding: Option<String>,
    pub statement_span: Range<usize>,
    pub specifier_span: Range<usize>,
    pub line: usize,
}

/// Which specifiers a scan keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportFilter {
    /// Specifiers starting with the given prefix (`@/hooks/`).
    Prefix(String),
    /// Alias (`@/`) or relative (`./`, `../`) specifiers.
    Local { alias_prefix: String },
}

impl ImportFilter {
    pub fn matches(&self, spec: &str) -> bool {
        match self {
            ImportFilter::Prefix(prefix) => spec.starts_with(prefix.as_str()),
            ImportFilter::Local { alias_prefix } => {
                spec.starts_with(alias_prefix.as_str()) || specifier::is_relative(spec)
            }
        }
    }
}

/// A file's text together with the imports the filter kept.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub source: String,
    pub imports: Vec<ImportRecord>,
}

pub struct ImportScanner<'a> {
    config: &'a ExtguardConfig,
    filter: ImportFilter,
}

impl<'a> ImportScanner<'a> {
    pub fn new(config: &'a ExtguardConfig, filter: ImportFilter) -> Self {
        Self { config, filter }
    }

    /// Scanner for imports that go through the hooks alias.
    pub fn for_hooks(config: &'a ExtguardConfig) -> Self {
        Self::new(config, ImportFilter::Prefix(config.hooks_prefix()))
    }

    /// Lazy sequence of source files under `root`.
    pub fn candidate_files(&self, root: &Path) -> impl Iterator<Item = PathBuf> + use<> {
        files::walk_source_files(
            root,
            &self.config.source_extensions,
            &self.config.ignore_patterns,
        )
    }

    /// Reads and scans one file. An unreadable file is a
    /// [`ExtguardError::FileRead`] for that file only.
    pub fn scan_file(&self, path: &Path) -> Result<ScannedFile> {
        let source = fs::read_to_string(path).map_err(|e| ExtguardError::read(path, e))?;
        let imports = self.scan_source(path, &source)?;
        Ok(ScannedFile {
            path: path.to_path_buf(),
            source,
            imports,
        })
    }

    pub fn scan_source(&self, path: &Path, source: &str) -> Result<Vec<ImportRecord>> {
        let tree = syntax::parse_file_source(path, source)?;
        if tree.root_node().has_error() {
            debug!(file = %path.display(), "syntax errors present, scanning what parsed");
        }

        let records = syntax::collect_imports(&tree, source)
            .into_iter()
            .filter(|parsed| self.filter.matches(parsed.specifier_text(source)))
            .map(|parsed| ImportRecord {
                source_file: path.to_path_buf(),
                raw_statement: parsed.statement_text(source).to_string(),
                specifier: parsed.specifier_text(source).to_string(),
                named_bindings: parsed.named_bindings,
                default_binding: parsed.default_binding,
                namespace_binding: parsed.namespace_binding,
                statement_span: parsed.statement,
                specifier_span: parsed.specifier,
                line: parsed.line,
            })
            .collect::<Vec<_>>();

        debug!(file = %path.display(), imports = records.len(), "scanned");
        Ok(records)
    }
}
