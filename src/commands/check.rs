use colored::*;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

use super::OutputFormat;
use crate::checks::{
    CheckReport, ExportConventionChecker, ImportConsistencyChecker, ImportReport, Outcome,
};
use crate::context::ProjectContext;
use crate::ui;

fn exit_for(has_errors: bool) -> ExitCode {
    if has_errors {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

pub fn run_exports(ctx: &ProjectContext, files: &[PathBuf]) -> CheckReport {
    ExportConventionChecker::new(ctx.config.convention_prefix.as_str())
        .check_files(files.iter().map(PathBuf::as_path))
}

pub fn print_exports(ctx: &ProjectContext, report: &CheckReport) {
    for verdict in report.convention_files() {
        let file = ctx.relative(&verdict.file).display().to_string();
        ui::status(verdict.outcome, &file, &verdict.message);
        if verdict.outcome != Outcome::Ok {
            if let Some(hint) = &verdict.hint {
                ui::hint(hint);
            }
        }
    }
}

pub fn handle_check_exports(
    ctx: &ProjectContext,
    files: &[PathBuf],
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let files = super::cli_paths(files)?;
    let report = run_exports(ctx, &files);

    match format {
        OutputFormat::Json => {
            let body = json!({
                "checked": report.convention_files().count(),
                "ok": report.count(Outcome::Ok),
                "warnings": report.count(Outcome::Warn),
                "errors": report.count(Outcome::Error),
                "verdicts": report.verdicts,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            print_exports(ctx, &report);
            if report.convention_files().count() == 0 {
                println!("{} No convention files among the given paths.", "ℹ️".cyan());
            }
        }
    }
    Ok(exit_for(report.has_errors()))
}

pub fn run_imports(ctx: &ProjectContext, files: &[PathBuf]) -> ImportReport {
    ImportConsistencyChecker::new(ctx).check_files(files.iter().map(PathBuf::as_path))
}

pub fn print_imports(ctx: &ProjectContext, files: &[PathBuf], report: &ImportReport) {
    for file in files {
        let display = ctx.relative(file).display().to_string();
        if let Some(failure) = report.failures.iter().find(|f| &f.path == file) {
            ui::error(&display, &failure.error.to_string());
            continue;
        }
        let mut clean = true;
        for issue in report.issues_for(file) {
            clean = false;
            ui::error(&format!("{}:{}", display, issue.line), &issue.message);
            if let Some(hint) = &issue.hint {
                ui::hint(hint);
            }
        }
        if clean {
            ui::ok(&display, "imports look good");
        }
    }
}

pub fn handle_check_imports(
    ctx: &ProjectContext,
    files: &[PathBuf],
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let files = super::cli_paths(files)?;
    let report = run_imports(ctx, &files);

    match format {
        OutputFormat::Json => {
            let failures: Vec<_> = report
                .failures
                .iter()
                .map(|f| json!({ "file": f.path, "error": f.error.to_string() }))
                .collect();
            let body = json!({
                "checked": report.files_checked,
                "errors": report.issues.len() + report.failures.len(),
                "issues": report.issues,
                "failures": failures,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => print_imports(ctx, &files, &report),
    }
    Ok(exit_for(report.has_errors()))
}
