//! Template rendering with handlebars
//!
//! Rendering is strict: a template naming a value that is not provided fails
//! instead of writing an empty string. Output is not HTML-escaped. Case
//! variants come from helpers (`{{pascal moduleId}}`, `{{camel moduleId}}`,
//! `{{title moduleName}}`). Literal double braces, as in a JSX style object,
//! are written `\{{`.

use crate::config::GeneratorConfig;
use crate::modules::path::{camel_case, pascal_case, title_case};
use crate::modules::ModuleDescriptor;
use anyhow::Result;
use handlebars::Handlebars;
use serde_json::{Map, Value};

/// Directive line that suppresses the write
const SKIP_DIRECTIVE: &str = "@skip";

/// Outcome of rendering one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Content(String),
    /// The template asked not to be written for this module
    Skip,
}

/// Values available to templates
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: Map<String, Value>,
    is_child: bool,
}

impl TemplateVars {
    pub fn for_module(desc: &ModuleDescriptor, config: &GeneratorConfig, locale: &str) -> Self {
        let mut vars = Self {
            is_child: desc.is_child,
            ..Self::default()
        };
        vars.set("moduleId", desc.module_id.clone());
        vars.set("moduleName", desc.path.name());
        vars.set("featureFlagKey", desc.feature_flag_key.clone());
        vars.set(
            "envVar",
            format!("{}{}", config.env_prefix, desc.feature_flag_key),
        );
        vars.set("alias", desc.path.alias(config));
        vars.set("routeExport", desc.route_export());
        vars.set("childRouteExport", desc.child_route_export());
        vars.set("routePath", desc.route_path());
        vars.set("routeConstructor", config.route_constructor.clone());
        vars.set("placeholder", config.children_placeholder.clone());
        vars.set("locale", locale);
        vars.set("isChild", desc.is_child);

        if desc.is_child {
            vars.set("childMarker", format!("{}\n", config.child_marker));
            vars.set(
                "childExport",
                format!(
                    "\n\nexport const {} = {};",
                    desc.child_route_export(),
                    desc.route_export()
                ),
            );
        } else {
            vars.set("childMarker", "");
            vars.set("childExport", "");
        }
        vars
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// String value of `key`, if it is one
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn is_child(&self) -> bool {
        self.is_child
    }
}

/// Handlebars registry configured for source-code templates
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        // Register helpers
        handlebars.register_helper("pascal", Box::new(pascal_helper));
        handlebars.register_helper("camel", Box::new(camel_helper));
        handlebars.register_helper("title", Box::new(title_helper));

        Self { handlebars }
    }

    /// Render `source` for a module, honouring a leading skip directive
    ///
    /// Directives: `@skip` always skips, `@skip-if-child` / `@skip-if-standalone`
    /// skip conditionally. A directive line is never part of the output.
    pub fn render(&self, template_name: &str, source: &str, vars: &TemplateVars) -> Result<Rendered> {
        let (first, rest) = source.split_once('\n').unwrap_or((source, ""));
        let directive = first.trim();
        let body = if directive.starts_with(SKIP_DIRECTIVE) {
            let skip = match directive {
                "@skip" => true,
                "@skip-if-child" => vars.is_child(),
                "@skip-if-standalone" => !vars.is_child(),
                other => anyhow::bail!(
                    "Template '{}' has an unknown directive '{}'",
                    template_name,
                    other
                ),
            };
            if skip {
                return Ok(Rendered::Skip);
            }
            rest
        } else {
            source
        };

        self.handlebars
            .render_template(body, &vars.values)
            .map(Rendered::Content)
            .map_err(|e| anyhow::anyhow!("Template '{}' failed to render: {}", template_name, e))
    }
}

/// Write the first parameter through `convert`
fn write_cased(
    h: &handlebars::Helper,
    out: &mut dyn handlebars::Output,
    convert: fn(&str) -> String,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&convert(param))?;
    Ok(())
}

fn pascal_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    write_cased(h, out, pascal_case)
}

fn camel_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    write_cased(h, out, camel_case)
}

fn title_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    write_cased(h, out, title_case)
}
