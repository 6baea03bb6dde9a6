//! Rewriter: adds the required suffix to imports of pinned modules.
//!
//! The core is a pure text transform ([`rewrite_source`]) over the spans the
//! scanner found; only specifier bytes change, everything around them is
//! copied verbatim. [`Rewriter`] drives it over a file set in apply or
//! dry-run mode and keeps per-file failures out of the way of other files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::context::ProjectContext;
use crate::error::{ExtguardError, FileFailure, Result};
use crate::rules::{RuleTable, Specifier};
use crate::scanner::{ImportRecord, ImportScanner};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    Apply,
    DryRun,
}

/// Outcome of examining one import record against the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub source_file: PathBuf,
    pub changed: bool,
    pub updated_statement: Option<String>,
    pub original_specifier: String,
    pub updated_specifier: Option<String>,
    pub line: usize,
}

/// Decides whether `record` needs a suffix and builds the updated statement.
pub fn rewrite_statement(record: &ImportRecord, table: &RuleTable) -> RewriteResult {
    let unchanged = RewriteResult {
        source_file: record.source_file.clone(),
        changed: false,
        updated_statement: None,
        original_specifier: record.specifier.clone(),
        updated_specifier: None,
        line: record.line,
    };

    let Some(rule) = table.lookup(&record.specifier) else {
        return unchanged;
    };
    let Some(spec) = Specifier::parse(&record.specifier) else {
        return unchanged;
    };
    if spec.ends_with_suffix(rule.required_suffix) {
        return unchanged;
    }

    let updated_specifier = spec.with_suffix(rule.required_suffix);

    // Specifier span relative to the start of the statement.
    let rel_start = record.specifier_span.start - record.statement_span.start;
    let rel_end = record.specifier_span.end - record.statement_span.start;
    let updated_statement = match (
        record.raw_statement.get(..rel_start),
        record.raw_statement.get(rel_end..),
    ) {
        (Some(head), Some(tail)) => format!("{}{}{}", head, updated_specifier, tail),
        _ => {
            warn!(
                file = %record.source_file.display(),
                line = record.line,
                "specifier span does not fit its statement, leaving it alone"
            );
            return unchanged;
        }
    };

    RewriteResult {
        changed: true,
        updated_statement: Some(updated_statement),
        updated_specifier: Some(updated_specifier),
        ..unchanged
    }
}

/// Result of rewriting one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRewrite {
    pub content: String,
    pub results: Vec<RewriteResult>,
}

impl SourceRewrite {
    pub fn imports_fixed(&self) -> usize {
        self.results.iter().filter(|r| r.changed).count()
    }
}

/// Substitutes every changed specifier into `source`. Bytes outside the
/// specifier spans are preserved exactly.
pub fn rewrite_source(source: &str, records: &[ImportRecord], table: &RuleTable) -> SourceRewrite {
    let mut ordered: Vec<&ImportRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.specifier_span.start);

    let mut content = String::with_capacity(source.len() + records.len() * 4);
    let mut cursor = 0usize;
    let mut results = Vec::with_capacity(records.len());

    for record in ordered {
        let mut result = rewrite_statement(record, table);
        let span = &record.specifier_span;

        if result.changed {
            let fits = span.start >= cursor
                && span.end <= source.len()
                && source.is_char_boundary(span.start)
                && source.is_char_boundary(span.end)
                && source[span.clone()] == record.specifier;
            match (&result.updated_specifier, fits) {
                (Some(updated), true) => {
                    content.push_str(&source[cursor..span.start]);
                    content.push_str(updated);
                    cursor = span.end;
                }
                _ => {
                    warn!(
                        file = %record.source_file.display(),
                        line = record.line,
                        "stale or overlapping span, import left untouched"
                    );
                    result.changed = false;
                    result.updated_statement = None;
                    result.updated_specifier = None;
                }
            }
        }
        results.push(result);
    }
    content.push_str(&source[cursor..]);

    SourceRewrite { content, results }
}

/// What happened to one file.
#[derive(Debug, Clone)]
pub struct FileRewrite {
    pub path: PathBuf,
    pub results: Vec<RewriteResult>,
    pub imports_fixed: usize,
    pub written: bool,
}

#[derive(Debug, Default)]
pub struct RewriteSummary {
    pub files_scanned: usize,
    pub files_modified: usize,
    pub imports_fixed: usize,
    /// Modified (or, in dry-run, would-be modified) files in scan order.
    pub changes: Vec<FileRewrite>,
    pub failures: Vec<FileFailure>,
}

impl RewriteSummary {
    pub fn has_pending_fixes(&self) -> bool {
        self.imports_fixed > 0
    }

    /// `3 files scanned`, with `, N failed` when some files were skipped.
    pub fn scan_line(&self) -> String {
        let scanned = ui::count(self.files_scanned, "file", "files");
        if self.failures.is_empty() {
            format!("{} scanned", scanned)
        } else {
            format!("{} scanned, {} failed", scanned, self.failures.len())
        }
    }
}

impl fmt::Display for RewriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fixed across {}",
            ui::count(self.imports_fixed, "import", "imports"),
            ui::count(self.files_modified, "file", "files"),
        )
    }
}

/// How rewritten text reaches disk.
pub type WriteFn = fn(&Path, &str) -> std::io::Result<()>;

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}

pub struct Rewriter<'a> {
    ctx: &'a ProjectContext,
    mode: RewriteMode,
    scanner: ImportScanner<'a>,
    write: WriteFn,
}

impl<'a> Rewriter<'a> {
    pub fn new(ctx: &'a ProjectContext, mode: RewriteMode) -> Self {
        Self {
            ctx,
            mode,
            scanner: ImportScanner::for_hooks(&ctx.config),
            write: write_file,
        }
    }

    pub fn with_writer(mut self, write: WriteFn) -> Self {
        self.write = write;
        self
    }

    /// Rewrites one file. In apply mode the file is overwritten only when
    /// something changed.
    pub fn process_file(&self, path: &Path) -> Result<FileRewrite> {
        let scanned = self.scanner.scan_file(path)?;
        let rewrite = rewrite_source(&scanned.source, &scanned.imports, &self.ctx.rules);
        let imports_fixed = rewrite.imports_fixed();

        let mut written = false;
        if imports_fixed > 0 && self.mode == RewriteMode::Apply {
            (self.write)(path, &rewrite.content).map_err(|e| ExtguardError::write(path, e))?;
            written = true;
            info!(file = %path.display(), imports_fixed, "rewrote imports");
        } else if imports_fixed > 0 {
            debug!(file = %path.display(), imports_fixed, "dry run, not writing");
        }

        Ok(FileRewrite {
            path: path.to_path_buf(),
            results: rewrite.results,
            imports_fixed,
            written,
        })
    }

    /// Processes `files` one by one. A failing file is recorded in the
    /// summary and the run moves on.
    pub fn run<I>(&self, files: I) -> RewriteSummary
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut summary = RewriteSummary::default();
        for path in files {
            summary.files_scanned += 1;
            match self.process_file(&path) {
                Ok(outcome) if outcome.imports_fixed > 0 => {
                    summary.files_modified += 1;
                    summary.imports_fixed += outcome.imports_fixed;
                    summary.changes.push(outcome);
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(error = %error, "file skipped");
                    summary.failures.push(FileFailure { path, error });
                }
            }
        }
        summary
    }

    /// Runs over every source file under the project's source root.
    pub fn run_project(&self) -> RewriteSummary {
        let root = self.ctx.source_root();
        self.run(self.scanner.candidate_files(&root))
    }
}
