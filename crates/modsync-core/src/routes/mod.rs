//! Route artifacts: parsing, linking and tree reconstruction

pub mod link;
pub mod syntax;
pub mod tree;

pub use link::{link_child, relative_reference, unlink_child, LinkOutcome};
pub use tree::{discover_route_files, reconstruct, RouteTree, RouteTreeNode, SourceLocation};

use crate::config::GeneratorConfig;
use anyhow::Result;
use std::path::Path;
use syntax::Dialect;

/// Exports declared by a route artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteExports {
    /// Binding initialised with the route constructor call
    pub main: Option<String>,
    /// Alias of `main` exported for merging into a parent
    pub child: Option<String>,
    pub has_child_marker: bool,
}

impl RouteExports {
    /// Identifier a parent should merge: the child alias when present
    pub fn link_ident(&self) -> Option<String> {
        self.child.clone().or_else(|| self.main.clone())
    }
}

/// Read the route exports of a parsed artifact
pub fn route_exports(content: &str, file: &Path, config: &GeneratorConfig) -> Result<RouteExports> {
    let tree = syntax::parse(content, Dialect::for_path(file))?;
    let consts = syntax::exported_consts(&tree, content);

    let main = consts
        .iter()
        .find(|(_, value)| {
            value.kind() == "call_expression"
                && value
                    .child_by_field_name("function")
                    .is_some_and(|f| syntax::text(f, content) == config.route_constructor)
        })
        .map(|(name, _)| name.clone());

    let child = main.as_ref().and_then(|main| {
        consts
            .iter()
            .find(|(_, value)| value.kind() == "identifier" && syntax::text(*value, content) == main)
            .map(|(name, _)| name.clone())
    });

    let has_child_marker = content
        .lines()
        .any(|line| line.trim() == config.child_marker.trim());

    Ok(RouteExports {
        main,
        child,
        has_child_marker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_artifact_exports() {
        let content = "import { defineRoutes } from '@/lib/router';
// @child-module

export const reportsMonthlyRoutes = defineRoutes([{ path: 'monthly' }]);

export const reportsMonthlyChildRoutes = reportsMonthlyRoutes;
";
        let exports =
            route_exports(content, Path::new("x.routes.tsx"), &GeneratorConfig::default()).unwrap();
        assert_eq!(exports.main.as_deref(), Some("reportsMonthlyRoutes"));
        assert_eq!(exports.child.as_deref(), Some("reportsMonthlyChildRoutes"));
        assert!(exports.has_child_marker);
        assert_eq!(exports.link_ident().as_deref(), Some("reportsMonthlyChildRoutes"));
    }

    #[test]
    fn test_standalone_artifact_links_main_export() {
        let content = "export const billingRoutes = defineRoutes([]);\n";
        let exports =
            route_exports(content, Path::new("x.routes.ts"), &GeneratorConfig::default()).unwrap();
        assert_eq!(exports.child, None);
        assert!(!exports.has_child_marker);
        assert_eq!(exports.link_ident().as_deref(), Some("billingRoutes"));
    }

    #[test]
    fn test_no_constructor_call() {
        let content = "export const routes = [];\n";
        let exports =
            route_exports(content, Path::new("x.routes.ts"), &GeneratorConfig::default()).unwrap();
        assert_eq!(exports.link_ident(), None);
    }
}
