use std::ops::Range;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator, Tree};

/// A static `import`, or an `export ... from` re-export, as it appears in
/// the syntax tree. Re-exports carry no bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImport {
    /// Byte range of the whole statement.
    pub statement: Range<usize>,
    /// Byte range of the specifier text, quotes excluded.
    pub specifier: Range<usize>,
    /// 1-based line of the statement.
    pub line: usize,
    pub default_binding: Option<String>,
    pub namespace_binding: Option<String>,
    /// Imported names in source order (`{ a as b }` yields `a`).
    pub named_bindings: Vec<String>,
}

impl ParsedImport {
    pub fn specifier_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.specifier.clone()]
    }

    pub fn statement_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.statement.clone()]
    }
}

const IMPORT_QUERY: &str = r#"
    (import_statement source: (string) @source) @import
    (export_statement source: (string) @source) @import
"#;

/// Every static import and re-export in `tree`, in source order. Imports with an empty
/// specifier are dropped.
pub fn collect_imports(tree: &Tree, source: &str) -> Vec<ParsedImport> {
    let language = tree.language();
    let query = match Query::new(&language, IMPORT_QUERY) {
        Ok(q) => q,
        Err(e) => {
            tracing::error!(error = %e, "import query does not compile for this grammar");
            return Vec::new();
        }
    };
    let (Some(import_idx), Some(source_idx)) = (
        query.capture_index_for_name("import"),
        query.capture_index_for_name("source"),
    ) else {
        return Vec::new();
    };

    let bytes = source.as_bytes();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), bytes);
    let mut imports = Vec::new();

    while let Some(m) = matches.next() {
        let import_node = m.captures.iter().find(|c| c.index == import_idx).map(|c| c.node);
        let source_node = m.captures.iter().find(|c| c.index == source_idx).map(|c| c.node);
        let (Some(import_node), Some(source_node)) = (import_node, source_node) else {
            continue;
        };

        // `string` spans the quotes; the specifier sits between them.
        let start = source_node.start_byte() + 1;
        let end = source_node.end_byte().saturating_sub(1);
        if end <= start {
            continue;
        }

        let mut parsed = ParsedImport {
            statement: import_node.start_byte()..import_node.end_byte(),
            specifier: start..end,
            line: import_node.start_position().row + 1,
            default_binding: None,
            namespace_binding: None,
            named_bindings: Vec::new(),
        };
        read_bindings(import_node, bytes, &mut parsed);
        imports.push(parsed);
    }

    imports.sort_by_key(|i| i.statement.start);
    imports
}

fn read_bindings(import_node: Node, bytes: &[u8], parsed: &mut ParsedImport) {
    let mut cursor = import_node.walk();
    let Some(clause) = import_node
        .named_children(&mut cursor)
        .find(|n| n.kind() == "import_clause")
    else {
        return;
    };

    let text = |n: Node| n.utf8_text(bytes).unwrap_or("").to_string();

    let mut clause_cursor = clause.walk();
    for child in clause.named_children(&mut clause_cursor) {
        match child.kind() {
            "identifier" => parsed.default_binding = Some(text(child)),
            "namespace_import" => {
                let mut c = child.walk();
                parsed.namespace_binding = child
                    .named_children(&mut c)
                    .find(|n| n.kind() == "identifier")
                    .map(text);
            }
            "named_imports" => {
                let mut c = child.walk();
                for spec in child
                    .named_children(&mut c)
                    .filter(|n| n.kind() == "import_specifier")
                {
                    if let Some(name) = spec.child_by_field_name("name") {
                        let name = text(name);
                        parsed
                            .named_bindings
                            .push(name.trim_matches(|ch| ch == '"' || ch == '\'').to_string());
                    }
                }
            }
            _ => {}
        }
    }
}
