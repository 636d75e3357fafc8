//! Artifact templates
//!
//! This module provides:
//! - Built-in templates compiled into the binary
//! - Per-project overrides read from a local templates directory
//! - Handlebars rendering with skip directives

pub mod render;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use render::{Rendered, TemplateEngine, TemplateVars};

/// Template used when an ancestor needs a minimal route artifact
pub const ROUTE_STUB_TEMPLATE: &str = "route-stub.tsx.tpl";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("page.tsx.tpl", include_str!("../../templates/page.tsx.tpl")),
    ("route.tsx.tpl", include_str!("../../templates/route.tsx.tpl")),
    (
        "route-stub.tsx.tpl",
        include_str!("../../templates/route-stub.tsx.tpl"),
    ),
    ("store.ts.tpl", include_str!("../../templates/store.ts.tpl")),
    ("hook.ts.tpl", include_str!("../../templates/hook.ts.tpl")),
    ("service.ts.tpl", include_str!("../../templates/service.ts.tpl")),
    ("constant.ts.tpl", include_str!("../../templates/constant.ts.tpl")),
    ("type.ts.tpl", include_str!("../../templates/type.ts.tpl")),
    ("lib.ts.tpl", include_str!("../../templates/lib.ts.tpl")),
    ("context.tsx.tpl", include_str!("../../templates/context.tsx.tpl")),
    ("locale.json.tpl", include_str!("../../templates/locale.json.tpl")),
    ("config.ts.tpl", include_str!("../../templates/config.ts.tpl")),
];

/// Where a template's source came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin,
    Local(PathBuf),
}

/// Resolves template sources, preferring the project's local overrides
#[derive(Debug, Clone)]
pub struct TemplateSet {
    local_dir: PathBuf,
    engine: Arc<TemplateEngine>,
}

impl TemplateSet {
    pub fn new(local_dir: PathBuf) -> Self {
        Self {
            local_dir,
            engine: Arc::new(TemplateEngine::new()),
        }
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Load a template's source text
    pub fn load(&self, name: &str) -> Result<(String, TemplateSource)> {
        let local = self.local_dir.join(name);
        if local.is_file() {
            let content = std::fs::read_to_string(&local)
                .with_context(|| format!("Failed to read template {}", local.display()))?;
            return Ok((content, TemplateSource::Local(local)));
        }

        BUILTIN_TEMPLATES
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, content)| (content.to_string(), TemplateSource::Builtin))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Template '{}' not found in {} or the built-in set",
                    name,
                    self.local_dir.display()
                )
            })
    }

    /// Load and render a template
    pub fn render(&self, name: &str, vars: &TemplateVars) -> Result<Rendered> {
        let (source, origin) = self.load(name)?;
        tracing::debug!(template = name, ?origin, "rendering template");
        self.engine.render(name, &source, vars)
    }
}
