//! Grammar-backed parsing of JS/TS sources.
//!
//! Imports and exports are read from a tree-sitter syntax tree rather than
//! from raw text, so statements quoted inside comments or string literals
//! are never mistaken for real ones.

pub mod exports;
pub mod imports;

pub use exports::{ExportSummary, collect_exports};
pub use imports::{ParsedImport, collect_imports};

use std::path::Path;
use tree_sitter::{Language, Parser, Tree};

use crate::error::{ExtguardError, Result};

/// Grammar for a file extension; `None` for non-script files.
pub fn language_for_extension(ext: &str) -> Option<Language> {
    match ext {
        "ts" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "js" | "jsx" | "mjs" | "cjs" => Some(tree_sitter_javascript::LANGUAGE.into()),
        _ => None,
    }
}

/// Grammar for `path`, falling back to JavaScript (which covers JSX).
pub fn language_for(path: &Path) -> Language {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(language_for_extension)
        .unwrap_or_else(|| tree_sitter_javascript::LANGUAGE.into())
}

pub fn parse(path: &Path, language: &Language, source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(language).map_err(|e| ExtguardError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parser.parse(source, None).ok_or_else(|| ExtguardError::Parse {
        path: path.to_path_buf(),
        reason: "parser returned no tree".to_string(),
    })
}

/// Parses `source` with the grammar picked from `path`.
pub fn parse_file_source(path: &Path, source: &str) -> Result<Tree> {
    parse(path, &language_for(path), source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_grammar_by_extension() {
        assert!(language_for_extension("jsx").is_some());
        assert!(language_for_extension("tsx").is_some());
        assert!(language_for_extension("css").is_none());
    }

    #[test]
    fn parses_jsx_with_javascript_grammar() {
        let tree = parse_file_source(
            Path::new("Card.jsx"),
            "export const Card = () => <div className=\"card\" />;\n",
        )
        .unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn parses_typescript() {
        let tree = parse_file_source(
            Path::new("useTyped.ts"),
            "import type { Props } from './types';\nexport const useTyped = (p: Props): number => 1;\n",
        )
        .unwrap();
        assert!(!tree.root_node().has_error());
    }
}
