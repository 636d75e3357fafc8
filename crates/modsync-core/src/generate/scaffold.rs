//! Ancestor scaffolding
//!
//! A nested module needs every ancestor to exist as a module before it can be
//! linked or registered. Missing ancestor artifacts are synthesized here; ones
//! already on disk are never touched.

use super::{write_artifact, GeneratedArtifact};
use crate::flags;
use crate::modules::{ModuleDescriptor, ModulePath, Workspace};
use crate::report::Reporter;
use crate::templates::{TemplateVars, ROUTE_STUB_TEMPLATE};
use anyhow::{Context, Result};

/// Create a route stub for each ancestor without a route artifact
///
/// Stubs carry the children placeholder so descendants can be merged in.
pub fn ensure_ancestor_routes(
    ws: &Workspace,
    reporter: &dyn Reporter,
    path: &ModulePath,
) -> Result<Vec<GeneratedArtifact>> {
    let config = ws.config();
    let Some(spec) = config.route_spec() else {
        return Ok(Vec::new());
    };

    let mut created = Vec::new();
    for ancestor in path.ancestors() {
        if ws.find_route_file(&ancestor).is_some() {
            continue;
        }

        let desc = ModuleDescriptor::new(ancestor.clone());
        let file = ws.artifact_path(&desc, spec, ws.default_locale());
        let vars = TemplateVars::for_module(&desc, config, ws.default_locale());
        let rendered = ws
            .templates()
            .render(ROUTE_STUB_TEMPLATE, &vars)
            .with_context(|| format!("Failed to render route stub for '{}'", ancestor))?;

        let artifact = write_artifact(&spec.name, &file, rendered, false)?;
        reporter.info(&format!("Created route stub {}", file.display()));
        created.push(artifact);
    }
    Ok(created)
}

/// Create a config artifact for each ancestor lacking one and register its flag
pub fn ensure_ancestor_configs(
    ws: &Workspace,
    reporter: &dyn Reporter,
    path: &ModulePath,
) -> Result<Vec<GeneratedArtifact>> {
    let config = ws.config();
    let Some(spec) = config.kind(&config.config_kind) else {
        return Ok(Vec::new());
    };

    let mut created = Vec::new();
    for ancestor in path.ancestors() {
        let desc = ModuleDescriptor::new(ancestor.clone());
        let file = ws.artifact_path(&desc, spec, ws.default_locale());
        if file.exists() {
            continue;
        }

        let vars = TemplateVars::for_module(&desc, config, ws.default_locale());
        let rendered = ws
            .templates()
            .render(&spec.template_name(), &vars)
            .with_context(|| format!("Failed to render config for '{}'", ancestor))?;
        let artifact = write_artifact(&spec.name, &file, rendered, false)?;
        if artifact.written() {
            reporter.info(&format!("Created config {}", file.display()));
            flags::register_flag(ws, reporter, &desc)?;
        }
        created.push(artifact);
    }
    Ok(created)
}

/// Create locale files for each ancestor, one per configured locale
pub fn ensure_ancestor_locales(
    ws: &Workspace,
    reporter: &dyn Reporter,
    path: &ModulePath,
) -> Result<Vec<GeneratedArtifact>> {
    let config = ws.config();
    let Some(spec) = config.kind(&config.locale_kind) else {
        return Ok(Vec::new());
    };

    let mut created = Vec::new();
    for ancestor in path.ancestors() {
        let desc = ModuleDescriptor::new(ancestor.clone());
        for locale in &config.locales {
            let file = ws.artifact_path(&desc, spec, locale);
            if file.exists() {
                continue;
            }
            let vars = TemplateVars::for_module(&desc, config, locale);
            let rendered = ws
                .templates()
                .render(&spec.template_name(), &vars)
                .with_context(|| format!("Failed to render {} locale for '{}'", locale, ancestor))?;
            let artifact = write_artifact(&spec.name, &file, rendered, false)?;
            if artifact.written() {
                reporter.info(&format!("Created {} locale {}", locale, file.display()));
            }
            created.push(artifact);
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::report::CollectingReporter;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Workspace) {
        let temp = tempfile::tempdir().unwrap();
        let mut config = GeneratorConfig::default();
        config.locales = vec!["en".to_string(), "vi".to_string()];
        let ws = Workspace::new(temp.path().to_path_buf(), config);
        (temp, ws)
    }

    #[test]
    fn test_route_stubs_for_missing_ancestors_only() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let path = ws.normalize("a/b/c").unwrap();

        let existing = ws.route_file(&ws.normalize("a").unwrap()).unwrap();
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "// hand written\n").unwrap();

        let created = ensure_ancestor_routes(&ws, &reporter, &path).unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(fs::read_to_string(&existing).unwrap(), "// hand written\n");

        let stub = fs::read_to_string(&created[0].file_path).unwrap();
        assert!(stub.contains("export const aBRoutes = defineRoutes(["));
        assert!(stub.contains("path: 'b',"));
        assert!(stub.contains("// @route-children"));
        assert!(stub.contains("export const aBChildRoutes = aBRoutes;"));

        assert!(ensure_ancestor_routes(&ws, &reporter, &path).unwrap().is_empty());
    }

    #[test]
    fn test_root_module_has_no_ancestors() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let path = ws.normalize("billing").unwrap();
        assert!(ensure_ancestor_routes(&ws, &reporter, &path).unwrap().is_empty());
        assert!(ensure_ancestor_locales(&ws, &reporter, &path).unwrap().is_empty());
    }

    #[test]
    fn test_locales_per_configured_locale() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let path = ws.normalize("reports/monthly").unwrap();

        let created = ensure_ancestor_locales(&ws, &reporter, &path).unwrap();
        assert_eq!(created.len(), 2);
        let dir = ws.module_dir(&ws.normalize("reports").unwrap()).join("locales");
        assert!(dir.join("en.json").is_file());
        assert!(dir.join("vi.json").is_file());

        let infos = reporter.infos();
        assert_eq!(infos.len(), 2);
        assert!(infos[0].starts_with("Created en locale "));
        assert!(infos[1].ends_with("vi.json"));

        assert!(ensure_ancestor_locales(&ws, &reporter, &path).unwrap().is_empty());
        assert_eq!(reporter.infos().len(), 2);
    }

    #[test]
    fn test_configs_warn_without_registry() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let path = ws.normalize("reports/monthly").unwrap();

        let created = ensure_ancestor_configs(&ws, &reporter, &path).unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(reporter.warnings().len(), 1);
    }
}
