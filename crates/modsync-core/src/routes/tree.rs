//! Static reconstruction of the logical route tree
//!
//! Every route artifact is parsed and the array passed to the route
//! constructor is interpreted entry by entry. Merge entries (`...childRoutes`)
//! are kept as opaque placeholders; they are not resolved against the files
//! they come from.

use super::syntax::{self, Dialect};
use crate::config::matches_any;
use crate::error::ParseIssue;
use crate::modules::Workspace;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tree_sitter::Node;
use walkdir::WalkDir;

/// Where a node was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// One reconstructed route entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTreeNode {
    /// Declared path segment (empty for index and pathless entries)
    pub segment: String,
    pub full_path: String,
    pub source: SourceLocation,
    pub children: Vec<RouteTreeNode>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub breadcrumb: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub requires_auth: Option<bool>,
    pub is_index: bool,
    /// Verbatim merge entry text, for entries that are not objects
    pub placeholder: Option<String>,
}

impl RouteTreeNode {
    fn is_absolute(&self) -> bool {
        self.placeholder.is_some() || self.segment.starts_with('/')
    }

    fn inherits_parent_path(&self) -> bool {
        self.is_index || self.placeholder.is_some() || self.segment.is_empty()
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RouteTreeNode::count).sum::<usize>()
    }
}

/// The reconstructed tree plus everything that could not be interpreted
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    pub nested_prefix: String,
    /// Entries with absolute paths, and top-level merge placeholders
    pub absolute: Vec<RouteTreeNode>,
    /// Relative entries mounted under `nested_prefix`
    pub nested: Vec<RouteTreeNode>,
    pub issues: Vec<ParseIssue>,
    pub files: Vec<PathBuf>,
}

/// Parse every route artifact in the workspace
pub fn reconstruct(ws: &Workspace) -> Result<RouteTree> {
    let nested_prefix = read_nested_prefix(ws);
    let files = discover_route_files(ws)?;
    tracing::debug!(count = files.len(), prefix = %nested_prefix, "reconstructing route tree");

    let mut tree = RouteTree {
        nested_prefix: nested_prefix.clone(),
        ..RouteTree::default()
    };

    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let display = file.strip_prefix(ws.root()).unwrap_or(file).to_path_buf();

        let (entries, issues) = parse_route_file(
            &display,
            &content,
            Dialect::for_path(file),
            &ws.config().route_constructor,
        )?;
        tree.issues.extend(issues);

        for mut entry in entries {
            if entry.is_absolute() {
                resolve_full_paths(&mut entry, "/");
                tree.absolute.push(entry);
            } else {
                resolve_full_paths(&mut entry, &nested_prefix);
                tree.nested.push(entry);
            }
        }
    }

    tree.files = files
        .iter()
        .map(|f| f.strip_prefix(ws.root()).unwrap_or(f).to_path_buf())
        .collect();
    Ok(tree)
}

/// Route artifacts under the source root, sorted, excluding the root aggregator
pub fn discover_route_files(ws: &Workspace) -> Result<Vec<PathBuf>> {
    let config = ws.config();
    let root_file = ws.root().join(&config.root_routes_file);
    let source_root = ws.source_root();
    if !source_root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(&source_root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e.path(), e.file_type().is_dir(), &config.skip_dirs));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", source_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if matches_any(&name, &config.route_file_patterns) && entry.path() != root_file {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

pub(crate) fn is_skipped_dir(path: &Path, is_dir: bool, skip_dirs: &[String]) -> bool {
    is_dir
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| skip_dirs.iter().any(|s| s == n))
}

/// Nested mount prefix from the project config artifact, or the default
pub fn read_nested_prefix(ws: &Workspace) -> String {
    let config = ws.config();
    let path = ws.root().join(&config.project_config);

    let prefix = std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .and_then(|value| {
            value
                .pointer(&config.nested_prefix_pointer)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .filter(|p| !p.trim().is_empty());

    match prefix {
        Some(prefix) if prefix.starts_with('/') => prefix,
        Some(prefix) => format!("/{}", prefix),
        None => {
            tracing::debug!(path = %path.display(), "nested prefix not configured, using default");
            config.default_nested_prefix.clone()
        }
    }
}

/// Interpret one file's route constructor calls
pub fn parse_route_file(
    file: &Path,
    content: &str,
    dialect: Dialect,
    constructor: &str,
) -> Result<(Vec<RouteTreeNode>, Vec<ParseIssue>)> {
    let tree = syntax::parse(content, dialect)?;
    let mut parser = EntryParser {
        file,
        source: content,
        issues: Vec::new(),
    };

    if tree.root_node().has_error() {
        parser.issue(
            tree.root_node(),
            "file has syntax errors; the tree may be incomplete".to_string(),
        );
    }

    let calls = syntax::constructor_calls(&tree, content, constructor);
    if calls.is_empty() {
        parser.issue(tree.root_node(), format!("no {}(...) call found", constructor));
    }

    let mut entries = Vec::new();
    for call in calls {
        match syntax::first_array_argument(call) {
            Some(array) => entries.extend(parser.array(array)),
            None => parser.issue(
                call,
                format!("{}(...) is not called with an array literal", constructor),
            ),
        }
    }

    Ok((entries, parser.issues))
}

struct EntryParser<'a> {
    file: &'a Path,
    source: &'a str,
    issues: Vec<ParseIssue>,
}

impl EntryParser<'_> {
    fn issue(&mut self, node: Node<'_>, message: String) {
        let (line, column) = syntax::position(node);
        self.issues.push(ParseIssue {
            file: self.file.to_path_buf(),
            line,
            column,
            message,
        });
    }

    fn location(&self, node: Node<'_>) -> SourceLocation {
        let (line, column) = syntax::position(node);
        SourceLocation {
            file: self.file.to_path_buf(),
            line,
            column,
        }
    }

    fn array(&mut self, array: Node<'_>) -> Vec<RouteTreeNode> {
        syntax::entries(array)
            .into_iter()
            .filter_map(|entry| self.entry(entry))
            .collect()
    }

    fn entry(&mut self, node: Node<'_>) -> Option<RouteTreeNode> {
        match node.kind() {
            "object" => Some(self.object(node)),
            "spread_element" => Some(RouteTreeNode {
                segment: String::new(),
                full_path: String::new(),
                source: self.location(node),
                children: Vec::new(),
                name: None,
                title: None,
                breadcrumb: None,
                permissions: None,
                requires_auth: None,
                is_index: false,
                placeholder: Some(syntax::text(node, self.source).to_string()),
            }),
            other => {
                self.issue(node, format!("unsupported route entry `{}`", other));
                None
            }
        }
    }

    fn object(&mut self, object: Node<'_>) -> RouteTreeNode {
        let mut node = RouteTreeNode {
            segment: String::new(),
            full_path: String::new(),
            source: self.location(object),
            children: Vec::new(),
            name: None,
            title: None,
            breadcrumb: None,
            permissions: None,
            requires_auth: None,
            is_index: false,
            placeholder: None,
        };

        if let Some(path) = syntax::object_field(object, self.source, "path") {
            match syntax::string_value(path, self.source) {
                Some(value) => node.segment = value,
                None => self.issue(path, "route path is not a string literal".to_string()),
            }
        }

        node.name = self.string_field(object, "name");

        if let Some(index) = syntax::object_field(object, self.source, "index") {
            match index.kind() {
                "true" => node.is_index = true,
                "false" => {}
                other => self.issue(index, format!("index flag is `{}`, not a boolean", other)),
            }
        }

        if let Some(handle) = syntax::object_field(object, self.source, "handle") {
            if handle.kind() == "object" {
                self.handle(handle, &mut node);
            } else {
                self.issue(handle, format!("handle is `{}`, not an object literal", handle.kind()));
            }
        }

        if let Some(children) = syntax::object_field(object, self.source, "children") {
            if children.kind() == "array" {
                node.children = self.array(children);
            } else {
                self.issue(
                    children,
                    format!("children is `{}`, not an array literal", children.kind()),
                );
            }
        }

        node
    }

    fn handle(&mut self, handle: Node<'_>, node: &mut RouteTreeNode) {
        node.title = self.string_field(handle, "title");
        node.breadcrumb = self.string_field(handle, "breadcrumb");

        if let Some(permissions) = syntax::object_field(handle, self.source, "permissions") {
            if permissions.kind() == "array" {
                let mut values = Vec::new();
                for item in syntax::entries(permissions) {
                    match syntax::string_value(item, self.source) {
                        Some(value) => values.push(value),
                        None => self.issue(item, "permission is not a string literal".to_string()),
                    }
                }
                node.permissions = Some(values);
            } else {
                self.issue(permissions, "permissions is not an array literal".to_string());
            }
        }

        if let Some(auth) = syntax::object_field(handle, self.source, "isRequiredAuth") {
            match auth.kind() {
                "true" => node.requires_auth = Some(true),
                "false" => node.requires_auth = Some(false),
                other => self.issue(auth, format!("isRequiredAuth is `{}`, not a boolean", other)),
            }
        }
    }

    fn string_field(&mut self, object: Node<'_>, name: &str) -> Option<String> {
        let value = syntax::object_field(object, self.source, name)?;
        let parsed = syntax::string_value(value, self.source);
        if parsed.is_none() {
            self.issue(value, format!("{} is not a string literal", name));
        }
        parsed
    }
}

/// Compute full paths top-down from `parent`
pub fn resolve_full_paths(node: &mut RouteTreeNode, parent: &str) {
    node.full_path = if node.inherits_parent_path() {
        parent.to_string()
    } else {
        join_route_path(parent, &node.segment)
    };

    let full = node.full_path.clone();
    for child in &mut node.children {
        resolve_full_paths(child, &full);
    }
}

fn join_route_path(parent: &str, segment: &str) -> String {
    if segment.starts_with('/') {
        return normalize_slashes(segment);
    }
    normalize_slashes(&format!("{}/{}", parent.trim_end_matches('/'), segment))
}

fn normalize_slashes(path: &str) -> String {
    let joined = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

impl RouteTree {
    /// Total number of reconstructed nodes
    pub fn node_count(&self) -> usize {
        self.absolute
            .iter()
            .chain(self.nested.iter())
            .map(RouteTreeNode::count)
            .sum()
    }

    /// Indented text rendering with per-node metadata
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Absolute routes");
        render_nodes(&mut out, &self.absolute, "");
        if self.absolute.is_empty() {
            let _ = writeln!(out, "  (none)");
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Nested routes (mounted under {})", self.nested_prefix);
        render_nodes(&mut out, &self.nested, "");
        if self.nested.is_empty() {
            let _ = writeln!(out, "  (none)");
        }

        out
    }
}

fn render_nodes(out: &mut String, nodes: &[RouteTreeNode], prefix: &str) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let continuation = if last { "    " } else { "│   " };

        let mut label = match &node.placeholder {
            Some(text) => format!("{} (merged)", text),
            None => node.full_path.clone(),
        };
        if node.is_index {
            label.push_str(" (index)");
        }
        if let Some(name) = &node.name {
            let _ = write!(label, "  {}", name);
        }
        let _ = writeln!(
            out,
            "{}{}{}  [{}:{}:{}]",
            prefix,
            branch,
            label,
            node.source.file.display(),
            node.source.line,
            node.source.column
        );

        let meta = metadata(node);
        if !meta.is_empty() {
            let _ = writeln!(out, "{}{}  {}", prefix, continuation, meta);
        }

        render_nodes(out, &node.children, &format!("{}{}", prefix, continuation));
    }
}

fn metadata(node: &RouteTreeNode) -> String {
    let mut parts = Vec::new();
    if let Some(title) = &node.title {
        parts.push(format!("title: {}", title));
    }
    if let Some(breadcrumb) = &node.breadcrumb {
        parts.push(format!("breadcrumb: {}", breadcrumb));
    }
    if let Some(permissions) = &node.permissions {
        if !permissions.is_empty() {
            parts.push(format!("permissions: {}", permissions.join(", ")));
        }
    }
    match node.requires_auth {
        Some(true) => parts.push("auth required".to_string()),
        Some(false) => parts.push("public".to_string()),
        None => {}
    }
    parts.join(" · ")
}
