//! Generator configuration
//!
//! Everything that used to be ambient (kind table, restricted names, presets,
//! markers) lives on one [`GeneratorConfig`] value that is passed into every
//! component. A project can override any field from `modsync.yaml`; fields
//! not present in the file keep their defaults.

pub mod kinds;
pub mod version;

use crate::error::LinkWarning;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub use kinds::{default_kinds, expand_file_name, matches_any, FileNameVars, KindSpec};
pub use version::check_compatibility;

/// Project-level generator configuration (`modsync.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Source root relative to the project root
    pub source_root: String,

    /// Directory name that holds modules at every level
    pub modules_dir: String,

    /// Segment names that may not be used as module names
    pub restricted_segments: Vec<String>,

    /// Ordered artifact kind table
    pub kinds: Vec<KindSpec>,

    /// Named kind lists offered as shortcuts
    pub presets: BTreeMap<String, Vec<String>>,

    pub route_kind: String,
    pub config_kind: String,
    pub locale_kind: String,

    /// Locales generated by per-locale kinds
    pub locales: Vec<String>,

    /// Name of the call that builds a route array
    pub route_constructor: String,

    /// Comment marking where merge entries are inserted
    pub children_placeholder: String,

    /// Comment marking a route artifact as a child module
    pub child_marker: String,

    /// File name patterns identifying route artifacts
    pub route_file_patterns: Vec<String>,

    /// Top-level route aggregator, never reconstructed
    pub root_routes_file: String,

    /// Prefix of the module alias string (`@modules/` + segments)
    pub alias_prefix: String,

    pub flag_registry: String,
    pub flag_start_marker: String,
    pub flag_end_marker: String,

    /// Environment variable prefix for feature flags
    pub env_prefix: String,

    /// Project config artifact holding the nested route prefix
    pub project_config: String,

    /// JSON pointer into `project_config`
    pub nested_prefix_pointer: String,
    pub default_nested_prefix: String,

    /// Local template overrides, relative to the project root
    pub templates_dir: String,

    /// Directories skipped by every recursive scan
    pub skip_dirs: Vec<String>,

    /// Minimum CLI version the project expects
    pub min_cli_version: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let kinds = default_kinds();
        let mut presets = BTreeMap::new();
        presets.insert(
            "full".to_string(),
            kinds.iter().map(|k| k.name.clone()).collect(),
        );
        presets.insert(
            "minimal".to_string(),
            ["page", "route", "config", "locale"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        Self {
            source_root: "src".to_string(),
            modules_dir: "modules".to_string(),
            restricted_segments: [
                "modules",
                "components",
                "pages",
                "routes",
                "stores",
                "hooks",
                "services",
                "constants",
                "types",
                "libs",
                "contexts",
                "locales",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            kinds,
            presets,
            route_kind: "route".to_string(),
            config_kind: "config".to_string(),
            locale_kind: "locale".to_string(),
            locales: vec!["en".to_string()],
            route_constructor: "defineRoutes".to_string(),
            children_placeholder: "// @route-children".to_string(),
            child_marker: "// @child-module".to_string(),
            route_file_patterns: vec!["*.routes.tsx".to_string(), "*.routes.ts".to_string()],
            root_routes_file: "src/routes/app.routes.tsx".to_string(),
            alias_prefix: "@modules/".to_string(),
            flag_registry: "src/config/feature-flags.ts".to_string(),
            flag_start_marker: "// @feature-flags:start".to_string(),
            flag_end_marker: "// @feature-flags:end".to_string(),
            env_prefix: "VITE_FEATURE_".to_string(),
            project_config: "app.config.json".to_string(),
            nested_prefix_pointer: "/routing/nestedPrefix".to_string(),
            default_nested_prefix: "/app".to_string(),
            templates_dir: ".modsync/templates".to_string(),
            skip_dirs: ["node_modules", ".git", "dist", "build"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_cli_version: None,
        }
    }
}

impl GeneratorConfig {
    /// Load `<project_root>/<file_name>`, falling back to defaults when absent
    pub fn load(project_root: &Path, file_name: &str) -> Result<Self> {
        let path = project_root.join(file_name);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to a struct
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Look up a kind by name (case-insensitive)
    pub fn kind(&self, name: &str) -> Option<&KindSpec> {
        self.kinds.iter().find(|k| k.name.eq_ignore_ascii_case(name))
    }

    pub fn route_spec(&self) -> Option<&KindSpec> {
        self.kind(&self.route_kind)
    }

    pub fn is_restricted(&self, segment: &str) -> bool {
        self.restricted_segments.iter().any(|r| r == segment)
    }

    /// Warning when the project asks for a newer CLI than the one running
    pub fn outdated_cli(&self, cli_version: &str, upgrade_command: &str) -> Option<LinkWarning> {
        let required = self.min_cli_version.as_deref()?;
        check_compatibility(cli_version, required, upgrade_command).map(LinkWarning::CliOutdated)
    }

    /// Expand preset names into kind names, keeping order and dropping duplicates
    pub fn expand_kinds(&self, requested: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in requested {
            let expanded = match self.presets.get(name) {
                Some(list) => list.clone(),
                None => vec![name.clone()],
            };
            for kind in expanded {
                if !out.contains(&kind) {
                    out.push(kind);
                }
            }
        }
        out
    }
}
