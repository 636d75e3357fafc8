//! Wiring child route exports into parent route artifacts
//!
//! A link is two edits to the parent file: an import declaration binding the
//! child's route export, and a merge entry (`...childRoutes,`) inside a
//! `children` array. Both are planned against the unmodified text and applied
//! together, so a file is never left with only one of them.
//!
//! Insertion points come from the syntax tree. Files that do not parse cleanly
//! fall back to a balanced-bracket scan, which can be misled by brackets inside
//! strings or comments; it is only meant for artifacts this tool generated.

use super::syntax::{self, Dialect};
use crate::error::LinkWarning;
use crate::modules::{ModuleDescriptor, ModulePath, Workspace};
use crate::report::Reporter;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use tree_sitter::Tree;

/// A pending text replacement over byte offsets of the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TextEdit {
    pub(crate) fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    pub(crate) fn delete(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: String::new(),
        }
    }
}

/// Apply edits back to front so earlier offsets stay valid
pub(crate) fn apply_edits(source: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));
    let mut out = source.to_string();
    for edit in edits {
        out.replace_range(edit.start..edit.end, &edit.text);
    }
    out
}

/// Result of linking a child into its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked {
        file: PathBuf,
        added_import: bool,
        added_entry: bool,
    },
    AlreadyLinked(PathBuf),
    /// A warning was reported and nothing was written
    Skipped,
}

/// Edits needed to link one child, computed without touching the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LinkPlan {
    pub import_edit: Option<TextEdit>,
    pub entry_edits: Vec<TextEdit>,
}

impl LinkPlan {
    pub fn is_noop(&self) -> bool {
        self.import_edit.is_none() && self.entry_edits.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlanError {
    NoInsertionPoint,
}

/// Link `child_ident` (exported by `child_file`) into the route artifact of `parent`
pub fn link_child(
    ws: &Workspace,
    reporter: &dyn Reporter,
    parent: &ModulePath,
    child_ident: &str,
    child_file: &Path,
) -> Result<LinkOutcome> {
    let Some(parent_file) = ws.find_route_file(parent) else {
        reporter.warn(LinkWarning::ParentRouteMissing {
            parent: parent.to_string(),
            searched: ws.routes_dir(parent),
        });
        return Ok(LinkOutcome::Skipped);
    };

    let content = std::fs::read_to_string(&parent_file)
        .with_context(|| format!("Failed to read {}", parent_file.display()))?;

    let from_dir = parent_file.parent().unwrap_or(Path::new("."));
    let reference = relative_reference(from_dir, child_file);
    let anchor = ModuleDescriptor::new(parent.clone()).route_path();

    let plan = match plan_link(
        &content,
        Dialect::for_path(&parent_file),
        child_ident,
        &reference,
        Some(&anchor),
        &ws.config().children_placeholder,
    )? {
        Ok(plan) => plan,
        Err(PlanError::NoInsertionPoint) => {
            reporter.warn(LinkWarning::ChildrenArrayMissing { file: parent_file });
            return Ok(LinkOutcome::Skipped);
        }
    };

    if plan.is_noop() {
        tracing::debug!(parent = %parent, child = child_ident, "already linked");
        return Ok(LinkOutcome::AlreadyLinked(parent_file));
    }

    let added_import = plan.import_edit.is_some();
    let added_entry = !plan.entry_edits.is_empty();
    let mut edits = plan.entry_edits;
    edits.extend(plan.import_edit);

    let updated = apply_edits(&content, edits);
    std::fs::write(&parent_file, updated)
        .with_context(|| format!("Failed to write {}", parent_file.display()))?;

    reporter.info(&format!(
        "Linked {} into {}",
        child_ident,
        parent_file.display()
    ));

    Ok(LinkOutcome::Linked {
        file: parent_file,
        added_import,
        added_entry,
    })
}

/// Plan the import and merge-entry edits for one child
///
/// The outer `Result` carries parse failures; the inner one reports a missing
/// insertion point.
pub(crate) fn plan_link(
    content: &str,
    dialect: Dialect,
    ident: &str,
    reference: &str,
    anchor_path: Option<&str>,
    placeholder: &str,
) -> Result<std::result::Result<LinkPlan, PlanError>> {
    let tree = syntax::parse(content, dialect)?;
    let imports = syntax::imports(&tree, content);

    let already_imported = imports
        .iter()
        .any(|i| i.source == reference && i.bindings.iter().any(|b| b.local == ident));

    let import_edit = if already_imported {
        None
    } else {
        let declaration = format!("import {{ {} }} from '{}';", ident, reference);
        Some(match imports.last() {
            Some(last) => TextEdit::insert(last.end_byte, format!("\n{}", declaration)),
            None => TextEdit::insert(0, format!("{}\n", declaration)),
        })
    };

    let structural = !tree.root_node().has_error();
    let already_merged = if structural {
        has_merge_entry(&tree, content, ident)
    } else {
        spread_regex(ident).is_match(content)
    };

    if already_merged {
        return Ok(Ok(LinkPlan {
            import_edit,
            entry_edits: Vec::new(),
        }));
    }

    let entry = format!("...{},", ident);
    let entry_edits = if structural {
        structural_entry_edits(&tree, content, &entry, anchor_path, placeholder)
    } else {
        tracing::debug!("route file has syntax errors, using bracket scan");
        scanned_entry_edits(content, &entry, anchor_path, placeholder)
    };

    Ok(match entry_edits {
        Some(entry_edits) => Ok(LinkPlan {
            import_edit,
            entry_edits,
        }),
        None => Err(PlanError::NoInsertionPoint),
    })
}

fn has_merge_entry(tree: &Tree, content: &str, ident: &str) -> bool {
    syntax::children_arrays(tree, content).iter().any(|children| {
        syntax::entries(children.array)
            .into_iter()
            .any(|entry| syntax::spread_identifier(entry, content) == Some(ident))
    })
}

fn spread_regex(ident: &str) -> Regex {
    // The identifier is a JS identifier, so escaping keeps `$` literal
    Regex::new(&format!(r"\.\.\.\s*{}\b", regex::escape(ident))).expect("escaped pattern is valid")
}

fn structural_entry_edits(
    tree: &Tree,
    content: &str,
    entry: &str,
    anchor_path: Option<&str>,
    placeholder: &str,
) -> Option<Vec<TextEdit>> {
    let placeholder_node = syntax::collect(tree.root_node(), &|n| {
        n.kind() == "comment" && syntax::text(n, content).trim() == placeholder.trim()
    })
    .into_iter()
    .next();

    if let Some(comment) = placeholder_node {
        return Some(vec![before_line_of(content, comment.start_byte(), entry)]);
    }

    let arrays = syntax::children_arrays(tree, content);
    let anchored = anchor_path.and_then(|anchor| {
        arrays.iter().find(|children| {
            children
                .pair
                .parent()
                .and_then(|object| syntax::object_field(object, content, "path"))
                .and_then(|path| syntax::string_value(path, content))
                .is_some_and(|path| path.trim_start_matches('/') == anchor.trim_start_matches('/'))
        })
    });
    let target = anchored.or_else(|| arrays.first())?;

    let array = target.array;
    let close = array.end_byte() - 1;
    let elements = syntax::entries(array);
    let last_end = elements.last().map(|n| n.end_byte());

    // A "," token after the last element means the trailing comma is there already
    let mut cursor = array.walk();
    let has_trailing_comma = match last_end {
        Some(end) => array
            .children(&mut cursor)
            .any(|c| c.kind() == "," && c.start_byte() >= end),
        None => true,
    };

    let base_indent = line_indent(content, target.pair.start_byte());
    Some(closing_bracket_edits(
        content,
        close,
        last_end.filter(|_| !has_trailing_comma),
        &base_indent,
        entry,
    ))
}

/// Character-scan fallback for files the parser could not read cleanly
fn scanned_entry_edits(
    content: &str,
    entry: &str,
    anchor_path: Option<&str>,
    placeholder: &str,
) -> Option<Vec<TextEdit>> {
    if let Some(at) = content.find(placeholder.trim()) {
        return Some(vec![before_line_of(content, at, entry)]);
    }

    let search_from = anchor_path
        .and_then(|anchor| {
            ["'", "\""].iter().find_map(|quote| {
                content.find(&format!("path: {q}{a}{q}", q = quote, a = anchor))
            })
        })
        .unwrap_or(0);

    let token = search_from + content[search_from..].find("children")?;
    let open = token + content[token..].find('[')?;

    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut close = None;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;

    let before = content[open + 1..close].trim_end();
    let needs_comma = !before.trim().is_empty() && !before.ends_with(',');
    let last_end = needs_comma.then(|| open + 1 + before.len());

    let base_indent = line_indent(content, token);
    Some(closing_bracket_edits(content, close, last_end, &base_indent, entry))
}

/// Insert `entry` on its own line directly above the line containing `at`
fn before_line_of(content: &str, at: usize, entry: &str) -> TextEdit {
    let line_start = content[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let indent: String = content[line_start..at]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();
    TextEdit::insert(line_start, format!("{}{}\n", indent, entry))
}

/// Edits inserting `entry` before the closing bracket at `close`
///
/// `comma_after` is the end offset of a last element lacking a trailing comma.
fn closing_bracket_edits(
    content: &str,
    close: usize,
    comma_after: Option<usize>,
    base_indent: &str,
    entry: &str,
) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    if let Some(end) = comma_after {
        edits.push(TextEdit::insert(end, ","));
    }

    let item_indent = format!("{}  ", base_indent);
    let line_start = content[..close].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if content[line_start..close].trim().is_empty() {
        edits.push(TextEdit::insert(
            line_start,
            format!("{}{}\n", item_indent, entry),
        ));
    } else {
        edits.push(TextEdit::insert(
            close,
            format!("\n{}{}\n{}", item_indent, entry, base_indent),
        ));
    }
    edits
}

fn line_indent(content: &str, at: usize) -> String {
    let line_start = content[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    content[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Remove the import and merge entry for `ident` from a route artifact
///
/// Returns `Ok(false)` when the file had neither.
pub fn unlink_child(file: &Path, ident: &str) -> Result<bool> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    match plan_unlink(&content, Dialect::for_path(file), ident)? {
        Some(updated) => {
            std::fs::write(file, updated)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub(crate) fn plan_unlink(content: &str, dialect: Dialect, ident: &str) -> Result<Option<String>> {
    let tree = syntax::parse(content, dialect)?;
    let mut edits = Vec::new();

    for import in syntax::imports(&tree, content) {
        let matching: Vec<_> = import.bindings.iter().filter(|b| b.local == ident).collect();
        if matching.is_empty() {
            continue;
        }
        if matching.len() == import.bindings.len() {
            edits.push(whole_line_delete(content, import.start_byte, import.end_byte));
        } else {
            for binding in matching {
                edits.push(list_item_delete(content, binding.start_byte, binding.end_byte));
            }
        }
    }

    for children in syntax::children_arrays(&tree, content) {
        for entry in syntax::entries(children.array) {
            if syntax::spread_identifier(entry, content) == Some(ident) {
                edits.push(list_item_delete(content, entry.start_byte(), entry.end_byte()));
            }
        }
    }

    if edits.is_empty() {
        return Ok(None);
    }

    Ok(Some(apply_edits(content, merge_deletes(edits))))
}

/// Delete `start..end`, widened to the whole line when nothing else is on it
pub(crate) fn whole_line_delete(content: &str, start: usize, end: usize) -> TextEdit {
    let line_start = content[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = content[end..]
        .find('\n')
        .map(|i| end + i + 1)
        .unwrap_or(content.len());

    let only_ws_before = content[line_start..start].trim().is_empty();
    let only_ws_after = content[end..line_end].trim().is_empty();
    if only_ws_before && only_ws_after {
        TextEdit::delete(line_start, line_end)
    } else {
        TextEdit::delete(start, end)
    }
}

/// Delete one element of a comma-separated list along with one adjacent comma
///
/// Only the text touching `start..end` is inspected: the comma after the
/// element, or failing that the comma before it. An element on its own line
/// takes the whole line; a trailing comma left on the previous line is valid.
fn list_item_delete(content: &str, start: usize, end: usize) -> TextEdit {
    let after = &content[end..];
    let after_spaces = after.trim_start_matches([' ', '\t']);
    if let Some(after_comma) = after_spaces.strip_prefix(',') {
        let comma_end = content.len() - after_comma.len();
        let line = whole_line_delete(content, start, comma_end);
        if (line.start, line.end) != (start, comma_end) {
            return line;
        }
        let spaces = after_comma.len() - after_comma.trim_start_matches([' ', '\t']).len();
        return TextEdit::delete(start, comma_end + spaces);
    }

    let line = whole_line_delete(content, start, end);
    if (line.start, line.end) != (start, end) {
        return line;
    }

    let before = content[..start].trim_end_matches([' ', '\t']);
    match before.strip_suffix(',') {
        Some(kept) => TextEdit::delete(kept.len(), end),
        None => TextEdit::delete(start, end),
    }
}

/// Merge overlapping deletions so `apply_edits` never sees crossing ranges
fn merge_deletes(mut edits: Vec<TextEdit>) -> Vec<TextEdit> {
    edits.sort_by_key(|e| e.start);
    let mut merged: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        match merged.last_mut() {
            Some(last) if edit.start < last.end => last.end = last.end.max(edit.end),
            _ => merged.push(edit),
        }
    }
    merged
}

/// Import specifier from `from_dir` to `to_file`: extension stripped, `/`
/// separators, always starting with `.`
pub fn relative_reference(from_dir: &Path, to_file: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let stripped = to_file.with_extension("");
    let to: Vec<Component<'_>> = stripped.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(from.len() - common));
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    let joined = parts.join("/");
    if joined.starts_with('.') {
        joined
    } else {
        format!("./{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::report::CollectingReporter;
    use std::fs;

    const PLACEHOLDER: &str = "// @route-children";

    const PARENT: &str = "import { defineRoutes } from '@/lib/router';

export const reportsRoutes = defineRoutes([
  {
    path: 'reports',
    name: 'reports',
    children: [
      // @route-children
    ],
  },
]);
";

    fn plan(content: &str, ident: &str, reference: &str) -> String {
        let plan = plan_link(
            content,
            Dialect::Tsx,
            ident,
            reference,
            Some("reports"),
            PLACEHOLDER,
        )
        .unwrap()
        .unwrap();
        let mut edits = plan.entry_edits;
        edits.extend(plan.import_edit);
        apply_edits(content, edits)
    }

    #[test]
    fn test_links_before_placeholder() {
        let out = plan(PARENT, "monthlyChildRoutes", "../modules/monthly/routes/monthly.routes");
        assert!(out.contains(
            "import { defineRoutes } from '@/lib/router';\nimport { monthlyChildRoutes } from '../modules/monthly/routes/monthly.routes';\n"
        ));
        assert!(out.contains("      ...monthlyChildRoutes,\n      // @route-children\n"));
    }

    #[test]
    fn test_second_link_is_noop() {
        let once = plan(PARENT, "monthlyChildRoutes", "../m");
        let plan = plan_link(&once, Dialect::Tsx, "monthlyChildRoutes", "../m", Some("reports"), PLACEHOLDER)
            .unwrap()
            .unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_existing_import_with_other_path_still_gets_declaration() {
        let once = plan(PARENT, "monthlyChildRoutes", "../old");
        let plan = plan_link(&once, Dialect::Tsx, "monthlyChildRoutes", "../new", Some("reports"), PLACEHOLDER)
            .unwrap()
            .unwrap();
        assert!(plan.import_edit.is_some());
        assert!(plan.entry_edits.is_empty());
    }

    #[test]
    fn test_inserts_before_closing_bracket_without_placeholder() {
        let content = "export const r = defineRoutes([
  {
    path: '/other',
    children: [],
  },
  {
    path: 'reports',
    children: [
      ...aRoutes
    ],
  },
]);
";
        let out = plan(content, "bRoutes", "./b");
        assert!(out.starts_with("import { bRoutes } from './b';\nexport const r"));
        assert!(out.contains("      ...aRoutes,\n      ...bRoutes,\n    ],"));
        assert!(out.contains("path: '/other',\n    children: [],"));
    }

    #[test]
    fn test_inline_empty_children_array() {
        let content = "export const r = defineRoutes([{ path: 'reports', children: [] }]);\n";
        let out = plan(content, "bRoutes", "./b");
        assert!(out.contains("children: [\n  ...bRoutes,\n]"));
    }

    #[test]
    fn test_brackets_in_strings_do_not_confuse_structural_insert() {
        let content = "export const r = defineRoutes([
  {
    path: 'reports',
    children: [
      { path: 'x', handle: { title: 'a ] b [' } },
    ],
  },
]);
";
        let out = plan(content, "bRoutes", "./b");
        assert!(out.contains("{ path: 'x', handle: { title: 'a ] b [' } },\n      ...bRoutes,\n    ],"));
    }

    #[test]
    fn test_fallback_scan_on_broken_file() {
        let content = "export const r = defineRoutes([
  {
    path: 'reports',
    element: <Broken
    children: [
      ...aRoutes,
    ],
  },
]);
";
        let out = plan(content, "bRoutes", "./b");
        assert!(out.contains("      ...aRoutes,\n      ...bRoutes,\n    ],"));
    }

    #[test]
    fn test_no_children_array_is_reported() {
        let content = "export const r = defineRoutes([{ path: 'reports' }]);\n";
        let result = plan_link(content, Dialect::Tsx, "bRoutes", "./b", None, PLACEHOLDER).unwrap();
        assert_eq!(result, Err(PlanError::NoInsertionPoint));
    }

    #[test]
    fn test_unlink_removes_import_and_entry() {
        let linked = plan(PARENT, "monthlyChildRoutes", "../m");
        let linked = plan(&linked, "weeklyChildRoutes", "../w");

        let out = plan_unlink(&linked, Dialect::Tsx, "monthlyChildRoutes").unwrap().unwrap();
        assert!(!out.contains("monthlyChildRoutes"));
        assert!(out.contains("import { weeklyChildRoutes } from '../w';"));
        assert!(out.contains("      ...weeklyChildRoutes,\n      // @route-children"));

        assert!(plan_unlink(&out, Dialect::Tsx, "monthlyChildRoutes").unwrap().is_none());
    }

    #[test]
    fn test_unlink_keeps_other_specifiers() {
        let content = "import { aRoutes, bRoutes } from './x';\nexport const r = defineRoutes([{ path: 'p', children: [...aRoutes, ...bRoutes] }]);\n";
        let out = plan_unlink(content, Dialect::Tsx, "aRoutes").unwrap().unwrap();
        assert!(out.contains("import { bRoutes } from './x';"));
        assert!(out.contains("children: [...bRoutes]"));
    }

    #[test]
    fn test_unlink_leaves_unrelated_text_alone() {
        let content = "import { defineRoutes } from '@/lib/router';
import { aRoutes } from './a';
import { bRoutes } from './b';



export const r = defineRoutes([
  {
    path: 'reports',
    handle: { title: 'Totals [, x], , y' },
    children: [
      ...aRoutes,
      ...bRoutes,
    ],
  },
]);
";
        let out = plan_unlink(content, Dialect::Tsx, "aRoutes").unwrap().unwrap();
        let expected = content
            .replace("import { aRoutes } from './a';\n", "")
            .replace("      ...aRoutes,\n", "");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_unlink_inline_entries_take_one_comma() {
        let content = "export const r = defineRoutes([{ path: 'p', title: ', ,', children: [{ path: 'x' }, ...aRoutes] }]);\n";
        let out = plan_unlink(content, Dialect::Tsx, "aRoutes").unwrap().unwrap();
        assert_eq!(
            out,
            "export const r = defineRoutes([{ path: 'p', title: ', ,', children: [{ path: 'x' }] }]);\n"
        );

        let only = "export const r = defineRoutes([{ path: 'p', children: [ ...aRoutes ] }]);\n";
        let out = plan_unlink(only, Dialect::Tsx, "aRoutes").unwrap().unwrap();
        assert_eq!(out, "export const r = defineRoutes([{ path: 'p', children: [  ] }]);\n");
    }

    #[test]
    fn test_unlink_last_specifier_takes_preceding_comma() {
        let content = "import { aRoutes, bRoutes } from './x';\nexport const r = 1;\n";
        let out = plan_unlink(content, Dialect::Tsx, "bRoutes").unwrap().unwrap();
        assert_eq!(out, "import { aRoutes } from './x';\nexport const r = 1;\n");
    }

    #[test]
    fn test_relative_reference() {
        assert_eq!(
            relative_reference(
                Path::new("/p/src/modules/reports/routes"),
                Path::new("/p/src/modules/reports/modules/monthly/routes/reports-monthly.routes.tsx")
            ),
            "../modules/monthly/routes/reports-monthly.routes"
        );
        assert_eq!(
            relative_reference(Path::new("/p/routes"), Path::new("/p/routes/child.routes.ts")),
            "./child.routes"
        );
    }

    #[test]
    fn test_link_child_reports_missing_parent() {
        let temp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(temp.path().to_path_buf(), GeneratorConfig::default());
        let reporter = CollectingReporter::new();
        let parent = ws.normalize("reports").unwrap();

        let outcome = link_child(&ws, &reporter, &parent, "xRoutes", &temp.path().join("x.tsx")).unwrap();
        assert_eq!(outcome, LinkOutcome::Skipped);
        assert!(matches!(
            reporter.warnings()[0],
            LinkWarning::ParentRouteMissing { .. }
        ));
    }

    #[test]
    fn test_link_child_writes_once() {
        let temp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(temp.path().to_path_buf(), GeneratorConfig::default());
        let reporter = CollectingReporter::new();
        let parent = ws.normalize("reports").unwrap();
        let parent_file = ws.route_file(&parent).unwrap();
        fs::create_dir_all(parent_file.parent().unwrap()).unwrap();
        fs::write(&parent_file, PARENT).unwrap();

        let child = ws.normalize("reports/monthly").unwrap();
        let child_file = ws.route_file(&child).unwrap();

        let first = link_child(&ws, &reporter, &parent, "reportsMonthlyChildRoutes", &child_file).unwrap();
        assert!(matches!(first, LinkOutcome::Linked { added_import: true, added_entry: true, .. }));
        let second = link_child(&ws, &reporter, &parent, "reportsMonthlyChildRoutes", &child_file).unwrap();
        assert!(matches!(second, LinkOutcome::AlreadyLinked(_)));

        let content = fs::read_to_string(&parent_file).unwrap();
        assert_eq!(content.matches("...reportsMonthlyChildRoutes").count(), 1);
        assert!(content.contains(
            "from '../modules/monthly/routes/reports-monthly.routes';"
        ));
        assert!(reporter.warnings().is_empty());
    }
}
