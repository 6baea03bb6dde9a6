//! Módulo de Git
//!
//! Consultas al índice de Git para el gate de archivos staged.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{ExtguardError, Result};

/// Rutas absolutas agregadas, copiadas o modificadas en el índice.
pub fn staged_files(project_path: &Path) -> Result<Vec<PathBuf>> {
    let output = Command::new("git")
        .args(["diff", "--cached", "--name-only", "--diff-filter=ACM"])
        .current_dir(project_path)
        .output()
        .map_err(|e| ExtguardError::Git(format!("cannot run git: {}", e)))?;

    if !output.status.success() {
        return Err(ExtguardError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let files = parse_name_list(&String::from_utf8_lossy(&output.stdout))
        .map(|rel| repo_root(project_path).join(rel))
        .collect::<Vec<_>>();
    debug!(count = files.len(), "staged files");
    Ok(files)
}

/// Las rutas de `git diff --name-only` son relativas a la raíz del
/// repositorio, que puede estar por encima de la raíz del proyecto.
fn repo_root(project_path: &Path) -> PathBuf {
    Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(project_path)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| PathBuf::from(String::from_utf8_lossy(&o.stdout).trim()))
        .unwrap_or_else(|| project_path.to_path_buf())
}

fn parse_name_list(stdout: &str) -> impl Iterator<Item = &str> {
    stdout.lines().map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_list_skips_blank_lines() {
        let out = "resources/js/hooks/useA.js\n\n  resources/js/App.jsx \n";
        let names: Vec<_> = parse_name_list(out).collect();
        assert_eq!(names, vec!["resources/js/hooks/useA.js", "resources/js/App.jsx"]);
    }

    #[test]
    fn outside_a_repository_is_a_git_error() {
        let temp = tempfile::TempDir::new().unwrap();
        // falla si git no está instalado o si no es un repositorio
        assert!(matches!(
            staged_files(temp.path()),
            Err(ExtguardError::Git(_))
        ));
    }
}
