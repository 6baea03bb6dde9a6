pub mod check;
pub mod init;
pub mod resolve;
pub mod rewrite;
pub mod rules;
pub mod staged;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::ExtguardConfig;

#[derive(Parser)]
#[command(name = "extguard", version)]
#[command(about = "Keeps module import suffixes consistent across dev, build, lint and CI", long_about = None)]
pub struct Cli {
    /// Raíz del proyecto (por defecto: el directorio más cercano con .extguardrc.toml o package.json)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Logs de depuración y detalle por import
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Agrega la extensión requerida a los imports de módulos fijados
    Rewrite {
        /// Muestra qué cambiaría sin escribir
        #[arg(long)]
        dry_run: bool,
        /// Como --dry-run, pero sale con 1 si algún import necesita corrección
        #[arg(long, conflicts_with = "dry_run")]
        check: bool,
        /// Directorio a escanear (por defecto: la raíz de fuentes configurada)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Verifica que los archivos de la convención usen exports nombrados
    CheckExports {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Verifica que los imports coincidan con lo que exporta su destino
    CheckImports {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Ejecuta ambas verificaciones sobre los archivos staged de hooks y components
    Staged {
        /// Verifica estos archivos en lugar de consultar a git
        files: Vec<PathBuf>,
    },
    /// Resuelve un specifier igual que el hook del bundler
    Resolve {
        specifier: String,
        /// Archivo que contiene el import
        #[arg(long)]
        importer: Option<PathBuf>,
        #[arg(long, default_value_t = 2000)]
        timeout_ms: u64,
    },
    /// Muestra las reglas de rutas activas
    Rules,
    /// Genera un .extguardrc.toml por defecto
    Init {
        /// Sobrescribe una configuración existente
        #[arg(long)]
        force: bool,
    },
}

/// `--project` explícito, o el descubierto desde el directorio actual.
pub fn project_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(std::path::absolute(root)?);
    }
    let cwd = std::env::current_dir()?;
    Ok(ExtguardConfig::find_project_root(&cwd).unwrap_or(cwd))
}

/// Las rutas de la línea de comandos son relativas al directorio actual.
pub fn cli_paths(files: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    files
        .iter()
        .map(|f| std::path::absolute(f).map_err(Into::into))
        .collect()
}
