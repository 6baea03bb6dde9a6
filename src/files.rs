//! Descubrimiento de archivos para el scanner y los checkers.

use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Verdadero si algún componente de `rel` coincide con un patrón, o si un
/// patrón con `/` aparece dentro de la ruta (`public/build`).
pub fn is_ignored_path(rel: &Path, ignore_patterns: &[String]) -> bool {
    let rel_str = rel.to_string_lossy().replace('\\', "/");
    ignore_patterns.iter().any(|pattern| {
        if pattern.contains('/') {
            let pattern = pattern.trim_matches('/');
            rel_str == pattern
                || rel_str.starts_with(&format!("{}/", pattern))
                || rel_str.contains(&format!("/{}/", pattern))
                || rel_str.ends_with(&format!("/{}", pattern))
        } else {
            rel.components().any(|c| match c {
                Component::Normal(name) => name == pattern.as_str(),
                _ => false,
            })
        }
    })
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Recorre `root` de forma perezosa y entrega los archivos fuente ordenados
/// por nombre.
///
/// Respeta `.gitignore` y poda los directorios ignorados antes de entrar en
/// ellos. Las entradas ilegibles se registran y se omiten.
pub fn walk_source_files(
    root: &Path,
    extensions: &[String],
    ignore_patterns: &[String],
) -> impl Iterator<Item = PathBuf> + use<> {
    let prune_root = root.to_path_buf();
    let patterns = ignore_patterns.to_vec();
    let extensions = extensions.to_vec();

    ignore::WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let rel = entry.path().strip_prefix(&prune_root).unwrap_or(entry.path());
            !is_ignored_path(rel, &patterns)
        })
        .build()
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(move |path| has_extension(path, &extensions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn patterns() -> Vec<String> {
        vec!["node_modules".to_string(), "public/build".to_string()]
    }

    fn exts() -> Vec<String> {
        vec!["js".to_string(), "jsx".to_string()]
    }

    #[test]
    fn ignores_dependency_dirs_by_component() {
        assert!(is_ignored_path(Path::new("node_modules/react/index.js"), &patterns()));
        assert!(is_ignored_path(Path::new("pkg/node_modules/x.js"), &patterns()));
        assert!(!is_ignored_path(Path::new("src/node_modules_backup.js"), &patterns()));
    }

    #[test]
    fn ignores_multi_segment_patterns() {
        assert!(is_ignored_path(Path::new("public/build/assets/Card.js"), &patterns()));
        assert!(!is_ignored_path(Path::new("public/index.js"), &patterns()));
    }

    #[test]
    fn walk_finds_sources_and_skips_node_modules() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("resources/js/hooks")).unwrap();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::write(root.join("resources/js/hooks/useA.js"), "").unwrap();
        fs::write(root.join("resources/js/App.jsx"), "").unwrap();
        fs::write(root.join("resources/js/styles.css"), "").unwrap();
        fs::write(root.join("node_modules/lib/index.js"), "").unwrap();

        let found: Vec<PathBuf> = walk_source_files(root, &exts(), &patterns())
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("resources/js/App.jsx"),
                PathBuf::from("resources/js/hooks/useA.js"),
            ]
        );
    }

    #[test]
    fn walk_of_empty_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        assert_eq!(walk_source_files(temp.path(), &exts(), &patterns()).count(), 0);
    }
}
