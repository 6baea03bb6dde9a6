//! Import Consistency Checker.
//!
//! Resolves every alias or relative import of the given files and checks
//! that the bindings it asks for are actually exported by the target.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::read_exports;
use crate::context::ProjectContext;
use crate::error::{ExtguardError, FileFailure, Result};
use crate::scanner::{ImportFilter, ImportRecord, ImportScanner};
use crate::syntax::ExportSummary;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Unresolved,
    MissingDefaultExport,
    MissingNamedExport,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    pub file: PathBuf,
    pub line: usize,
    pub specifier: String,
    pub kind: IssueKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub files_checked: usize,
    pub issues: Vec<ImportIssue>,
    pub failures: Vec<FileFailure>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty() || !self.failures.is_empty()
    }

    pub fn issues_for<'r>(&'r self, file: &'r Path) -> impl Iterator<Item = &'r ImportIssue> {
        self.issues.iter().filter(move |i| i.file == file)
    }
}

pub struct ImportConsistencyChecker<'a> {
    ctx: &'a ProjectContext,
    scanner: ImportScanner<'a>,
    /// Export summaries of targets, per invocation. `None` = unreadable.
    exports: HashMap<PathBuf, Option<ExportSummary>>,
}

impl<'a> ImportConsistencyChecker<'a> {
    pub fn new(ctx: &'a ProjectContext) -> Self {
        let filter = ImportFilter::Local {
            alias_prefix: ctx.config.alias_prefix(),
        };
        Self {
            ctx,
            scanner: ImportScanner::new(&ctx.config, filter),
            exports: HashMap::new(),
        }
    }

    /// Maps an alias or relative specifier to an existing file. External
    /// packages and missing files give `None`.
    pub fn resolve(&self, specifier: &str, importer: &Path) -> Option<PathBuf> {
        let base = if let Some(rest) = specifier.strip_prefix(&self.ctx.config.alias_prefix()) {
            self.ctx.source_root().join(rest)
        } else if crate::rules::specifier::is_relative(specifier) {
            importer.parent().unwrap_or(Path::new("")).join(specifier)
        } else {
            return None;
        };

        if base.is_file() {
            return Some(base);
        }

        let exts = &self.ctx.config.source_extensions;
        let with_ext = exts.iter().map(|ext| {
            let mut p = base.clone().into_os_string();
            p.push(".");
            p.push(ext);
            PathBuf::from(p)
        });
        // directory imports resolve to their index module
        let index = exts.iter().map(|ext| base.join(format!("index.{}", ext)));

        with_ext.chain(index).find(|p| p.is_file())
    }

    fn exports_of(&mut self, target: &Path) -> Option<&ExportSummary> {
        self.exports
            .entry(target.to_path_buf())
            .or_insert_with(|| match read_exports(target) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!(error = %e, "cannot read import target");
                    None
                }
            })
            .as_ref()
    }

    fn check_import(&mut self, record: &ImportRecord) -> Vec<ImportIssue> {
        let issue = |kind, message: String, hint: Option<String>| ImportIssue {
            file: record.source_file.clone(),
            line: record.line,
            specifier: record.specifier.clone(),
            kind,
            message,
            hint,
        };

        let Some(target) = self.resolve(&record.specifier, &record.source_file) else {
            let err = ExtguardError::UnresolvedModule {
                specifier: record.specifier.clone(),
                importer: None,
            };
            return vec![issue(IssueKind::Unresolved, err.to_string(), None)];
        };

        // stylesheets, images and the like carry no exports to compare
        if !self.ctx.config.is_source_file(&target) {
            return Vec::new();
        }

        let target_display = self.ctx.relative(&target).display().to_string();
        let Some(summary) = self.exports_of(&target).cloned() else {
            return Vec::new();
        };

        let mut issues = Vec::new();
        if let Some(default) = &record.default_binding {
            if !summary.has_default {
                issues.push(issue(
                    IssueKind::MissingDefaultExport,
                    format!("default import used but no default export found in {}", target_display),
                    Some(format!(
                        "use a named import instead: import {{ {} }} from '{}'",
                        default, record.specifier
                    )),
                ));
            }
        }

        if !summary.reexports_all {
            for name in &record.named_bindings {
                if name == "default" || summary.exports_name(name) {
                    continue;
                }
                let hint = if summary.has_default {
                    format!(
                        "the module has a default export, use: import {} from '{}'",
                        name, record.specifier
                    )
                } else {
                    "check the export name in the target module".to_string()
                };
                issues.push(issue(
                    IssueKind::MissingNamedExport,
                    format!("named import '{}' not found as export in {}", name, target_display),
                    Some(hint),
                ));
            }
        }
        issues
    }

    pub fn check_file(&mut self, path: &Path) -> Result<Vec<ImportIssue>> {
        let scanned = self.scanner.scan_file(path)?;
        let mut issues = Vec::new();
        for record in &scanned.imports {
            issues.extend(self.check_import(record));
        }
        debug!(file = %path.display(), imports = scanned.imports.len(), issues = issues.len(), "imports checked");
        Ok(issues)
    }

    pub fn check_files<'p, I>(&mut self, files: I) -> ImportReport
    where
        I: IntoIterator<Item = &'p Path>,
    {
        let mut report = ImportReport::default();
        for path in files {
            report.files_checked += 1;
            match self.check_file(path) {
                Ok(issues) => report.issues.extend(issues),
                Err(error) => report.failures.push(FileFailure {
                    path: path.to_path_buf(),
                    error,
                }),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtguardConfig;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, ProjectContext) {
        let temp = TempDir::new().unwrap();
        for (rel, body) in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        let ctx = ProjectContext::new(temp.path(), ExtguardConfig::default()).unwrap();
        (temp, ctx)
    }

    #[test]
    fn consistent_imports_pass() {
        let (temp, ctx) = project(&[
            ("resources/js/hooks/useA.js", "export const useA = () => 1;\n"),
            ("resources/js/Components/Card.jsx", "export default function Card() {}\n"),
            (
                "resources/js/Pages/Home.jsx",
                "import React from 'react';\nimport { useA } from '@/hooks/useA';\nimport Card from '../Components/Card';\nimport './home.css';\n",
            ),
            ("resources/js/Pages/home.css", "body {}\n"),
        ]);
        let mut checker = ImportConsistencyChecker::new(&ctx);
        let issues = checker
            .check_file(&temp.path().join("resources/js/Pages/Home.jsx"))
            .unwrap();
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn unresolved_import_is_reported() {
        let (temp, ctx) = project(&[(
            "resources/js/App.jsx",
            "import { useGone } from '@/hooks/useGone';\n",
        )]);
        let mut checker = ImportConsistencyChecker::new(&ctx);
        let issues = checker
            .check_file(&temp.path().join("resources/js/App.jsx"))
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Unresolved);
        assert_eq!(issues[0].line, 1);
    }

    #[test]
    fn default_import_of_named_only_module() {
        let (temp, ctx) = project(&[
            ("resources/js/hooks/useA.js", "export const useA = () => 1;\n"),
            ("resources/js/App.jsx", "import useA from '@/hooks/useA.js';\n"),
        ]);
        let mut checker = ImportConsistencyChecker::new(&ctx);
        let issues = checker
            .check_file(&temp.path().join("resources/js/App.jsx"))
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingDefaultExport);
        assert!(issues[0].hint.as_deref().unwrap().contains("import { useA }"));
    }

    #[test]
    fn named_import_of_default_only_module_hints_default() {
        let (temp, ctx) = project(&[
            ("resources/js/hooks/useC.js", "export default function useC() {}\n"),
            ("resources/js/App.jsx", "import { useC as c } from '@/hooks/useC';\n"),
        ]);
        let mut checker = ImportConsistencyChecker::new(&ctx);
        let issues = checker
            .check_file(&temp.path().join("resources/js/App.jsx"))
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingNamedExport);
        assert!(issues[0].hint.as_deref().unwrap().contains("default export"));
    }

    #[test]
    fn directory_import_uses_index() {
        let (temp, ctx) = project(&[
            ("resources/js/lib/index.js", "export const helper = 1;\n"),
            ("resources/js/App.jsx", "import { helper } from './lib';\n"),
        ]);
        let mut checker = ImportConsistencyChecker::new(&ctx);
        let app = temp.path().join("resources/js/App.jsx");
        assert!(checker.resolve("./lib", &app).is_some());
        assert!(checker.check_file(&app).unwrap().is_empty());
    }

    #[test]
    fn report_collects_failures() {
        let (temp, ctx) = project(&[]);
        let missing = temp.path().join("resources/js/Nope.jsx");
        let mut checker = ImportConsistencyChecker::new(&ctx);
        let report = checker.check_files([missing.as_path()]);
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.has_errors());
    }
}
