use colored::*;
use std::path::Path;

use crate::config::{CONFIG_FILE, ExtguardConfig};

/// Candidate source roots, most specific first.
const SOURCE_ROOTS: &[&str] = &["resources/js", "src", "app/javascript"];

/// Picks the first candidate source root that exists under `root`.
pub fn detect_source_root(root: &Path) -> Option<&'static str> {
    SOURCE_ROOTS.iter().copied().find(|dir| root.join(dir).is_dir())
}

/// Runs `extguard init` in `project_root`.
/// Returns Err if a configuration already exists and force == false.
pub fn run_init(project_root: &Path, force: bool) -> anyhow::Result<()> {
    let config_path = project_root.join(CONFIG_FILE);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            config_path.display()
        );
    }

    let mut config = ExtguardConfig::default();
    if let Some(dir) = detect_source_root(project_root) {
        config.source_root = dir.to_string();
    }
    config.save(project_root)?;

    println!("{} Wrote {}", "✅".green(), config_path.display());
    println!("   source_root = {}", config.source_root);
    Ok(())
}
