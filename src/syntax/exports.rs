use serde::Serialize;
use tree_sitter::{Node, Tree};

/// What a module exports, as far as the convention checks care.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Exported names in source order.
    pub named: Vec<String>,
    pub has_default: bool,
    /// `export * from '...'` seen; the full name list is unknown.
    pub reexports_all: bool,
}

impl ExportSummary {
    pub fn exports_name(&self, name: &str) -> bool {
        self.named.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && !self.has_default
    }
}

/// Reads top-level `export` statements. `module.exports = ...` counts as a
/// default export.
pub fn collect_exports(tree: &Tree, source: &str) -> ExportSummary {
    let bytes = source.as_bytes();
    let root = tree.root_node();
    let mut summary = ExportSummary::default();

    let mut cursor = root.walk();
    for stmt in root.named_children(&mut cursor) {
        match stmt.kind() {
            "export_statement" => read_export(stmt, bytes, &mut summary),
            "expression_statement" if is_commonjs_export(stmt, bytes) => {
                summary.has_default = true;
            }
            _ => {}
        }
    }
    summary
}

fn read_export(stmt: Node, bytes: &[u8], summary: &mut ExportSummary) {
    let text = |n: Node| n.utf8_text(bytes).unwrap_or("").to_string();

    let mut cursor = stmt.walk();
    if stmt.children(&mut cursor).any(|c| c.kind() == "default") {
        summary.has_default = true;
        return;
    }

    if let Some(decl) = stmt.child_by_field_name("declaration") {
        match decl.kind() {
            "lexical_declaration" | "variable_declaration" => {
                let mut c = decl.walk();
                for declarator in decl
                    .named_children(&mut c)
                    .filter(|n| n.kind() == "variable_declarator")
                {
                    if let Some(name) = declarator
                        .child_by_field_name("name")
                        .filter(|n| n.kind() == "identifier")
                    {
                        summary.named.push(text(name));
                    }
                }
            }
            _ => {
                if let Some(name) = decl.child_by_field_name("name") {
                    summary.named.push(text(name));
                }
            }
        }
        return;
    }

    let mut c = stmt.walk();
    let children: Vec<Node> = stmt.children(&mut c).collect();

    if let Some(ns) = children.iter().find(|n| n.kind() == "namespace_export") {
        let mut nc = ns.walk();
        if let Some(name) = ns.named_children(&mut nc).last() {
            summary.named.push(text(name));
        }
        return;
    }
    if children.iter().any(|n| n.kind() == "*") {
        summary.reexports_all = true;
        return;
    }

    let Some(clause) = children.iter().find(|n| n.kind() == "export_clause") else {
        return;
    };

    let mut cc = clause.walk();
    for spec in clause
        .named_children(&mut cc)
        .filter(|n| n.kind() == "export_specifier")
    {
        let exported = spec
            .child_by_field_name("alias")
            .or_else(|| spec.child_by_field_name("name"))
            .map(text);
        match exported.as_deref() {
            Some("default") => summary.has_default = true,
            Some(name) => summary.named.push(name.to_string()),
            None => {}
        }
    }
}

fn is_commonjs_export(stmt: Node, bytes: &[u8]) -> bool {
    let Some(expr) = stmt.named_child(0) else {
        return false;
    };
    if expr.kind() != "assignment_expression" {
        return false;
    }
    expr.child_by_field_name("left")
        .and_then(|left| left.utf8_text(bytes).ok())
        .is_some_and(|left| left == "module.exports")
}
