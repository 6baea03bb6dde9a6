use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ExtguardConfig;
use crate::error::Result;
use crate::rules::RuleTable;

/// Lo que leen todos los puntos de control: raíz del proyecto, configuración
/// y tabla de reglas. Se construye una vez al arrancar y no se modifica.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_root: PathBuf,
    pub config: ExtguardConfig,
    pub rules: RuleTable,
}

impl ProjectContext {
    pub fn load(project_root: &Path) -> Result<Self> {
        let config = ExtguardConfig::load(project_root)?;
        Self::new(project_root, config)
    }

    pub fn new(project_root: &Path, config: ExtguardConfig) -> Result<Self> {
        config.validate()?;
        let project_root = std::path::absolute(project_root)
            .unwrap_or_else(|_| project_root.to_path_buf());
        let rules = RuleTable::from_config(&config, &project_root)?;
        debug!(
            root = %project_root.display(),
            rules = rules.len(),
            "project context ready"
        );
        Ok(Self {
            project_root,
            config,
            rules,
        })
    }

    pub fn source_root(&self) -> PathBuf {
        self.config.source_root_path(&self.project_root)
    }

    /// Ruta relativa a la raíz del proyecto cuando está dentro de ella.
    pub fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.project_root).unwrap_or(path)
    }
}
