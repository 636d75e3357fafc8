//! Artifact kind table and file name rules

use serde::{Deserialize, Serialize};

/// One generatable artifact kind (page, route, store, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSpec {
    /// Kind name used on the command line
    pub name: String,

    /// Directory relative to the module's base path ("" for the module root)
    #[serde(default)]
    pub dir: String,

    /// File name rule; supports `{id}`, `{pascal}`, `{camel}`, `{name}` and `{locale}`
    pub file_name: String,

    /// Template file name (defaults to `<name>.tpl`)
    #[serde(default)]
    pub template: Option<String>,

    /// Short description shown in the interactive kind picker
    #[serde(default)]
    pub description: String,
}

impl KindSpec {
    fn new(name: &str, dir: &str, file_name: &str, template: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: dir.to_string(),
            file_name: file_name.to_string(),
            template: Some(template.to_string()),
            description: description.to_string(),
        }
    }

    /// Template file this kind renders
    pub fn template_name(&self) -> String {
        self.template
            .clone()
            .unwrap_or_else(|| format!("{}.tpl", self.name))
    }

    /// Whether the file name rule produces one file per locale
    pub fn is_per_locale(&self) -> bool {
        self.file_name.contains("{locale}")
    }
}

/// Identifier forms substituted into file name rules
#[derive(Debug, Clone, Copy)]
pub struct FileNameVars<'a> {
    pub id: &'a str,
    pub pascal: &'a str,
    pub camel: &'a str,
    pub name: &'a str,
    pub locale: &'a str,
}

/// Expand a file name rule
pub fn expand_file_name(rule: &str, vars: FileNameVars<'_>) -> String {
    rule.replace("{id}", vars.id)
        .replace("{pascal}", vars.pascal)
        .replace("{camel}", vars.camel)
        .replace("{name}", vars.name)
        .replace("{locale}", vars.locale)
}

/// The kind table shipped with the CLI
pub fn default_kinds() -> Vec<KindSpec> {
    vec![
        KindSpec::new(
            "page",
            "components/pages",
            "{pascal}Page.tsx",
            "page.tsx.tpl",
            "Page component",
        ),
        KindSpec::new(
            "route",
            "routes",
            "{id}.routes.tsx",
            "route.tsx.tpl",
            "Route definitions",
        ),
        KindSpec::new("store", "stores", "{camel}Store.ts", "store.ts.tpl", "State store"),
        KindSpec::new("hook", "hooks", "use{pascal}.ts", "hook.ts.tpl", "Data hook"),
        KindSpec::new(
            "service",
            "services",
            "{camel}Service.ts",
            "service.ts.tpl",
            "API service",
        ),
        KindSpec::new(
            "constant",
            "constants",
            "{id}.constants.ts",
            "constant.ts.tpl",
            "Constants",
        ),
        KindSpec::new("type", "types", "{id}.types.ts", "type.ts.tpl", "Type definitions"),
        KindSpec::new("lib", "libs", "{id}.utils.ts", "lib.ts.tpl", "Helpers"),
        KindSpec::new(
            "context",
            "contexts",
            "{pascal}Context.tsx",
            "context.tsx.tpl",
            "React context",
        ),
        KindSpec::new("locale", "locales", "{locale}.json", "locale.json.tpl", "Translations"),
        KindSpec::new(
            "config",
            "",
            "{id}.config.ts",
            "config.ts.tpl",
            "Module config and feature flag",
        ),
    ]
}

/// Simple glob check: `*suffix`, `prefix*` or exact match
pub fn matches_any(file_name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix('*') {
            file_name.ends_with(suffix)
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            file_name.starts_with(prefix)
        } else {
            file_name == pattern
        }
    })
}
