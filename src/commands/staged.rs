use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

use super::check;
use crate::context::ProjectContext;
use crate::git;
use crate::staged::StagedScope;
use crate::ui;

/// Export and import checks over staged files in the hooks and components
/// scopes. Exit 1 when either check reports an error.
pub fn handle_staged(ctx: &ProjectContext, explicit: &[PathBuf]) -> anyhow::Result<ExitCode> {
    let candidates = if explicit.is_empty() {
        git::staged_files(&ctx.project_root)?
    } else {
        super::cli_paths(explicit)?
    };

    let scope = StagedScope::from_config(&ctx.config)?;
    let files = scope.select(&ctx.project_root, candidates);
    if files.is_empty() {
        println!("{} No staged files in scope.", "ℹ️".cyan());
        return Ok(ExitCode::SUCCESS);
    }

    ui::header(&format!(
        "Checking {}",
        ui::count(files.len(), "staged file", "staged files")
    ));

    let exports = check::run_exports(ctx, &files);
    check::print_exports(ctx, &exports);

    let imports = check::run_imports(ctx, &files);
    check::print_imports(ctx, &files, &imports);

    if exports.has_errors() || imports.has_errors() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
