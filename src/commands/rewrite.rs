use colored::*;
use std::path::Path;
use std::process::ExitCode;

use crate::context::ProjectContext;
use crate::rewriter::{RewriteMode, Rewriter};

pub fn handle_rewrite(
    ctx: &ProjectContext,
    dry_run: bool,
    check: bool,
    root: Option<&Path>,
    verbose: bool,
) -> anyhow::Result<ExitCode> {
    let mode = if dry_run || check {
        RewriteMode::DryRun
    } else {
        RewriteMode::Apply
    };
    let rewriter = Rewriter::new(ctx, mode);

    let summary = match root {
        Some(dir) => {
            let dir = std::path::absolute(dir)?;
            if !dir.is_dir() {
                anyhow::bail!("scan root {} is not a directory", dir.display());
            }
            rewriter.run(crate::files::walk_source_files(
                &dir,
                &ctx.config.source_extensions,
                &ctx.config.ignore_patterns,
            ))
        }
        None => rewriter.run_project(),
    };

    let label = match mode {
        RewriteMode::DryRun => "[DRY RUN]".yellow(),
        RewriteMode::Apply => "[FIXING]".green(),
    };
    for change in &summary.changes {
        println!("{} {}", label, ctx.relative(&change.path).display());
        if verbose {
            for result in change.results.iter().filter(|r| r.changed) {
                println!(
                    "   line {}: '{}' -> '{}'",
                    result.line,
                    result.original_specifier.dimmed(),
                    result.updated_specifier.as_deref().unwrap_or_default().green()
                );
            }
        }
    }

    for failure in &summary.failures {
        eprintln!("{} {}", "❌".red(), failure.error);
    }

    println!();
    println!("{}", summary.to_string().bold());
    println!("   {}", summary.scan_line());

    if check && summary.has_pending_fixes() {
        println!(
            "{} imports are missing their required suffix, run `extguard rewrite` to fix them",
            "❌".red()
        );
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
