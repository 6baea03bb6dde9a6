//! # extguard
//!
//! Mantiene consistente la resolución de imports entre el servidor de
//! desarrollo, el bundler de producción, el lint y CI. Reescribe los imports
//! sin extensión de módulos fijados, los resuelve en tiempo de build y
//! verifica la convención de exports de los hooks.

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// Módulos
pub mod checks;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod files;
pub mod git;
pub mod resolver;
pub mod rewriter;
pub mod rules;
pub mod scanner;
pub mod staged;
pub mod syntax;
pub mod ui;

use context::ProjectContext;

/// Variable de filtro para los diagnósticos en stderr.
const LOG_ENV: &str = "EXTGUARD_LOG";

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("extguard=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("{} {:#}", "❌".red(), e);
            ExitCode::from(2)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = commands::project_root(cli.project.as_deref())?;

    if let Commands::Init { force } = cli.command {
        commands::init::run_init(&root, force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = ProjectContext::load(&root)
        .with_context(|| format!("loading project at {}", root.display()))?;

    match cli.command {
        Commands::Rewrite {
            dry_run,
            check,
            root,
        } => commands::rewrite::handle_rewrite(&ctx, dry_run, check, root.as_deref(), cli.verbose),
        Commands::CheckExports { format, files } => {
            commands::check::handle_check_exports(&ctx, &files, format)
        }
        Commands::CheckImports { format, files } => {
            commands::check::handle_check_imports(&ctx, &files, format)
        }
        Commands::Staged { files } => commands::staged::handle_staged(&ctx, &files),
        Commands::Resolve {
            specifier,
            importer,
            timeout_ms,
        } => commands::resolve::handle_resolve(ctx, &specifier, importer, timeout_ms),
        Commands::Rules => Ok(commands::rules::handle_rules_command(&ctx)),
        Commands::Init { .. } => Ok(ExitCode::SUCCESS),
    }
}
