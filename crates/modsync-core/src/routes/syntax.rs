//! tree-sitter helpers for TypeScript/TSX route artifacts

use anyhow::Result;
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

/// Grammar used for a file, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    Tsx,
}

impl Dialect {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") | Some("mts") | Some("cts") => Dialect::TypeScript,
            _ => Dialect::Tsx,
        }
    }

    fn language(self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Parse a route artifact
pub fn parse(source: &str, dialect: Dialect) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| anyhow::anyhow!("Failed to load TypeScript grammar: {}", e))?;
    parser
        .parse(source, None)
        .ok_or_else(|| anyhow::anyhow!("Parser returned no tree"))
}

/// Source text covered by a node
pub fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.start_byte()..node.end_byte()]
}

/// 1-based line and column of a node's start
pub fn position(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}

/// Value of a plain string literal (`'x'` or `"x"`), without quotes
pub fn string_value(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {
            let raw = text(node, source);
            if raw.len() >= 2 {
                Some(raw[1..raw.len() - 1].to_string())
            } else {
                None
            }
        }
        "template_string" => {
            let raw = text(node, source);
            let mut cursor = node.walk();
            let has_substitution = node
                .named_children(&mut cursor)
                .any(|c| c.kind() == "template_substitution");
            if has_substitution || raw.len() < 2 {
                None
            } else {
                Some(raw[1..raw.len() - 1].to_string())
            }
        }
        _ => None,
    }
}

/// Named children that are not comments
pub fn entries<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Every node in the subtree (pre-order) for which `keep` returns true
pub fn collect<'t>(root: Node<'t>, keep: &dyn Fn(Node<'t>) -> bool) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if keep(node) {
            out.push(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Key text of an object `pair` (identifier or quoted)
pub fn pair_key(pair: Node<'_>, source: &str) -> Option<String> {
    let key = pair.child_by_field_name("key")?;
    match key.kind() {
        "property_identifier" | "identifier" => Some(text(key, source).to_string()),
        "string" => string_value(key, source),
        _ => None,
    }
}

/// Value node of the pair keyed `name` directly inside `object`
pub fn object_field<'t>(object: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    entries(object)
        .into_iter()
        .filter(|c| c.kind() == "pair")
        .find(|pair| pair_key(*pair, source).as_deref() == Some(name))
        .and_then(|pair| pair.child_by_field_name("value"))
}

/// One top-level `import` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub start_byte: usize,
    pub end_byte: usize,
    pub source: String,
    /// Local bindings introduced by the statement
    pub bindings: Vec<ImportBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    pub start_byte: usize,
    pub end_byte: usize,
}

/// Top-level import statements in document order
pub fn imports(tree: &Tree, source: &str) -> Vec<ImportDecl> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    root.named_children(&mut cursor)
        .filter(|n| n.kind() == "import_statement")
        .filter_map(|stmt| {
            let src_node = stmt.child_by_field_name("source")?;
            let bindings = collect(stmt, &|n| n.kind() == "import_specifier")
                .into_iter()
                .filter_map(|spec| {
                    let local = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"))?;
                    Some(ImportBinding {
                        local: text(local, source).to_string(),
                        start_byte: spec.start_byte(),
                        end_byte: spec.end_byte(),
                    })
                })
                .collect();
            Some(ImportDecl {
                start_byte: stmt.start_byte(),
                end_byte: stmt.end_byte(),
                source: string_value(src_node, source)?,
                bindings,
            })
        })
        .collect()
}

/// Calls to `constructor(...)` anywhere in the file
pub fn constructor_calls<'t>(tree: &'t Tree, source: &str, constructor: &str) -> Vec<Node<'t>> {
    collect(tree.root_node(), &|n| {
        n.kind() == "call_expression"
            && n.child_by_field_name("function")
                .is_some_and(|f| f.kind() == "identifier" && text(f, source) == constructor)
    })
}

/// First array-literal argument of a call
pub fn first_array_argument<'t>(call: Node<'t>) -> Option<Node<'t>> {
    let args = call.child_by_field_name("arguments")?;
    entries(args).into_iter().next().filter(|n| n.kind() == "array")
}

/// Exported `const` bindings: (name, value node)
pub fn exported_consts<'t>(tree: &'t Tree, source: &str) -> Vec<(String, Node<'t>)> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    let exports: Vec<Node<'t>> = root
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "export_statement")
        .collect();

    exports
        .into_iter()
        .filter_map(|stmt| stmt.child_by_field_name("declaration"))
        .filter(|decl| decl.kind() == "lexical_declaration")
        .flat_map(|decl| collect(decl, &|n| n.kind() == "variable_declarator"))
        .filter_map(|declarator| {
            let name = declarator.child_by_field_name("name")?;
            let value = declarator.child_by_field_name("value")?;
            Some((text(name, source).to_string(), value))
        })
        .collect()
}

/// A `children: [...]` array and where its key starts
#[derive(Debug, Clone, Copy)]
pub struct ChildrenArray<'t> {
    pub pair: Node<'t>,
    pub array: Node<'t>,
}

/// All `children` arrays in document order
pub fn children_arrays<'t>(tree: &'t Tree, source: &str) -> Vec<ChildrenArray<'t>> {
    collect(tree.root_node(), &|n| {
        n.kind() == "pair" && pair_key(n, source).as_deref() == Some("children")
    })
    .into_iter()
    .filter_map(|pair| {
        let array = pair.child_by_field_name("value")?;
        (array.kind() == "array").then_some(ChildrenArray { pair, array })
    })
    .collect()
}

/// Identifier spread by a `...ident` element, if the argument is a plain identifier
pub fn spread_identifier<'s>(spread: Node<'_>, source: &'s str) -> Option<&'s str> {
    if spread.kind() != "spread_element" {
        return None;
    }
    entries(spread)
        .into_iter()
        .next()
        .filter(|n| n.kind() == "identifier")
        .map(|n| text(n, source))
}
