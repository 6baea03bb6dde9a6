use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::context::ProjectContext;
use crate::resolver::{HooksResolver, PLUGIN_NAME, Resolution};

pub fn handle_resolve(
    ctx: ProjectContext,
    specifier: &str,
    importer: Option<PathBuf>,
    timeout_ms: u64,
) -> anyhow::Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let resolver = HooksResolver::new(Arc::new(ctx));
    let resolution = runtime.block_on(resolver.resolve_within(
        specifier,
        importer.as_deref(),
        Duration::from_millis(timeout_ms),
    ));

    if let Some(path) = resolution.path() {
        println!("{}", path.display());
        return Ok(ExitCode::SUCCESS);
    }
    if let Resolution::Declined(reason) = resolution {
        println!("{} {} declined '{}': {}", "↪".yellow(), PLUGIN_NAME, specifier, reason);
    }
    Ok(ExitCode::from(1))
}
