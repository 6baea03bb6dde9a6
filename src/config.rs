use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExtguardError, Result};
use crate::rules::Suffix;

/// Versión actual de extguard (leída desde Cargo.toml en tiempo de compilación)
pub const EXTGUARD_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONFIG_FILE: &str = ".extguardrc.toml";

/// Configuración del proyecto. Cada campo tiene su valor por defecto, así que
/// un proyecto sin `.extguardrc.toml` se comporta igual que uno con el
/// archivo vacío.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExtguardConfig {
    /// Alias que se expande a `source_root` (`@` en `@/hooks/useFoo`).
    pub alias: String,
    pub source_root: String,
    /// Relativo a `source_root`.
    pub hooks_dir: String,
    /// Relativo a `source_root`.
    pub components_dir: String,
    /// Prefijo de nombre que marca un archivo sujeto a la convención.
    pub convention_prefix: String,
    pub primary_suffix: Suffix,
    pub secondary_suffix: Suffix,
    pub source_extensions: Vec<String>,
    /// Módulos que siempre deben importarse con `primary_suffix`.
    pub explicit_modules: Vec<String>,
    /// Fija cada módulo encontrado en `hooks_dir` a la extensión que tiene en disco.
    pub discover_hooks: bool,
    pub ignore_patterns: Vec<String>,
    /// Alcance del gate de archivos staged; vacío = hooks + components.
    pub staged_globs: Vec<String>,
}

impl Default for ExtguardConfig {
    fn default() -> Self {
        Self {
            alias: "@".to_string(),
            source_root: "resources/js".to_string(),
            hooks_dir: "hooks".to_string(),
            components_dir: "Components".to_string(),
            convention_prefix: "use".to_string(),
            primary_suffix: Suffix::Js,
            secondary_suffix: Suffix::Jsx,
            source_extensions: vec![
                "js".to_string(),
                "jsx".to_string(),
                "ts".to_string(),
                "tsx".to_string(),
            ],
            explicit_modules: vec![
                "useORUtilizationData".to_string(),
                "usePatientFlowData".to_string(),
                "useAnalyticsData".to_string(),
            ],
            discover_hooks: true,
            ignore_patterns: vec![
                "node_modules".to_string(),
                "dist".to_string(),
                "build".to_string(),
                "vendor".to_string(),
                ".git".to_string(),
                "public/build".to_string(),
            ],
            staged_globs: Vec::new(),
        }
    }
}

impl ExtguardConfig {
    /// Carga `.extguardrc.toml` desde `root`, o los valores por defecto si no existe.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let config = match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "loading configuration");
                toml::from_str::<ExtguardConfig>(&content).map_err(|e| {
                    ExtguardError::Config(format!("{}: {}", path.display(), e.message()))
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "no {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
            Err(e) => return Err(ExtguardError::read(&path, e)),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let body = toml::to_string_pretty(self).map_err(|e| ExtguardError::Config(e.to_string()))?;
        fs::write(&path, body).map_err(|e| ExtguardError::write(&path, e))
    }

    pub fn validate(&self) -> Result<()> {
        if self.alias.is_empty() || self.alias.contains('/') {
            return Err(ExtguardError::Config(format!(
                "alias '{}' must be a non-empty path segment",
                self.alias
            )));
        }
        if self.hooks_dir.trim_matches('/').is_empty() {
            return Err(ExtguardError::Config("hooks_dir must not be empty".into()));
        }
        if self.primary_suffix == self.secondary_suffix {
            return Err(ExtguardError::Config(format!(
                "primary and secondary suffix are both .{}",
                self.primary_suffix
            )));
        }
        if self.convention_prefix.is_empty() {
            return Err(ExtguardError::Config("convention_prefix must not be empty".into()));
        }
        Ok(())
    }

    /// Sube desde `start` hasta el primer directorio que contenga el archivo
    /// de configuración o un `package.json`.
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE).is_file() || dir.join("package.json").is_file())
            .map(Path::to_path_buf)
    }

    /// `@/`
    pub fn alias_prefix(&self) -> String {
        format!("{}/", self.alias)
    }

    /// `@/hooks/`
    pub fn hooks_prefix(&self) -> String {
        format!("{}/{}/", self.alias, self.hooks_dir.trim_matches('/'))
    }

    pub fn source_root_path(&self, root: &Path) -> PathBuf {
        root.join(&self.source_root)
    }

    pub fn hooks_dir_path(&self, root: &Path) -> PathBuf {
        self.source_root_path(root).join(self.hooks_dir.trim_matches('/'))
    }

    pub fn probe_order(&self) -> [Suffix; 2] {
        [self.primary_suffix, self.secondary_suffix]
    }

    /// Globs del gate de archivos staged, relativos a la raíz del proyecto.
    pub fn staged_scopes(&self) -> Vec<String> {
        if !self.staged_globs.is_empty() {
            return self.staged_globs.clone();
        }
        let root = self.source_root.trim_end_matches('/');
        vec![
            format!("{}/{}/**/*.{{js,jsx}}", root, self.hooks_dir.trim_matches('/')),
            format!("{}/{}/**/*.{{js,jsx}}", root, self.components_dir.trim_matches('/')),
        ]
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.source_extensions.iter().any(|s| s == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ExtguardConfig::load(temp.path()).unwrap();
        assert_eq!(config, ExtguardConfig::default());
        assert_eq!(config.hooks_prefix(), "@/hooks/");
        assert_eq!(config.alias_prefix(), "@/");
        assert_eq!(config.probe_order(), [Suffix::Js, Suffix::Jsx]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "source_root = \"src\"\nprimary_suffix = \"jsx\"\nsecondary_suffix = \"js\"\n",
        )
        .unwrap();
        let config = ExtguardConfig::load(temp.path()).unwrap();
        assert_eq!(config.source_root, "src");
        assert_eq!(config.primary_suffix, Suffix::Jsx);
        assert_eq!(config.convention_prefix, "use");
        assert_eq!(
            config.hooks_dir_path(temp.path()),
            temp.path().join("src").join("hooks")
        );
    }

    #[test]
    fn same_primary_and_secondary_is_invalid() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "primary_suffix = \"js\"\nsecondary_suffix = \"js\"\n",
        )
        .unwrap();
        assert!(matches!(
            ExtguardConfig::load(temp.path()),
            Err(ExtguardError::Config(_))
        ));
    }

    #[test]
    fn unknown_suffix_is_a_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "primary_suffix = \"ts\"\n").unwrap();
        assert!(matches!(
            ExtguardConfig::load(temp.path()),
            Err(ExtguardError::Config(_))
        ));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let temp = TempDir::new().unwrap();
        let mut config = ExtguardConfig::default();
        config.explicit_modules.push("useBeds".to_string());
        config.save(temp.path()).unwrap();
        assert_eq!(ExtguardConfig::load(temp.path()).unwrap(), config);
    }

    #[test]
    fn finds_root_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        let nested = temp.path().join("resources/js/hooks");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(
            ExtguardConfig::find_project_root(&nested).as_deref(),
            Some(temp.path())
        );
    }

    #[test]
    fn default_staged_scopes_cover_hooks_and_components() {
        let scopes = ExtguardConfig::default().staged_scopes();
        assert_eq!(
            scopes,
            vec![
                "resources/js/hooks/**/*.{js,jsx}".to_string(),
                "resources/js/Components/**/*.{js,jsx}".to_string(),
            ]
        );
    }
}
