//! Artifact generation
//!
//! Each requested kind is rendered to its file; route, config and locale kinds
//! then pull in their ancestor scaffolding and linking. Generation is best
//! effort: a failing template aborts the run but files written before it stay.

pub mod scaffold;

use crate::config::KindSpec;
use crate::error::LinkWarning;
use crate::flags;
use crate::modules::{ModuleDescriptor, ModulePath, Workspace};
use crate::report::Reporter;
use crate::routes::{link, route_exports};
use crate::templates::{Rendered, TemplateVars};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Why an artifact was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file exists and overwriting was not requested
    Exists,
    /// The template opted out for this module
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    Created,
    Overwritten,
    Skipped(SkipReason),
}

/// One file the generator considered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: String,
    pub file_path: PathBuf,
    pub status: ArtifactStatus,
    pub existed_before: bool,
}

impl GeneratedArtifact {
    pub fn written(&self) -> bool {
        matches!(
            self.status,
            ArtifactStatus::Created | ArtifactStatus::Overwritten
        )
    }
}

/// Generates module artifacts and wires them into the module tree
pub struct Generator<'a> {
    ws: &'a Workspace,
    reporter: &'a dyn Reporter,
}

impl<'a> Generator<'a> {
    pub fn new(ws: &'a Workspace, reporter: &'a dyn Reporter) -> Self {
        Self { ws, reporter }
    }

    /// Generate `kinds` for `desc`
    pub fn generate(
        &self,
        desc: &ModuleDescriptor,
        kinds: &[String],
        overwrite: bool,
    ) -> Result<Vec<GeneratedArtifact>> {
        let config = self.ws.config();
        let mut artifacts = Vec::new();

        for kind_name in kinds {
            let Some(spec) = config.kind(kind_name) else {
                self.reporter.warn(LinkWarning::UnknownKind(kind_name.clone()));
                continue;
            };

            let locales: Vec<String> = if spec.is_per_locale() {
                config.locales.clone()
            } else {
                vec![self.ws.default_locale().to_string()]
            };

            for locale in &locales {
                let artifact = self
                    .generate_one(desc, spec, locale, overwrite)
                    .with_context(|| {
                        format!("Failed to generate {} for module '{}'", spec.name, desc.path)
                    })?;
                artifacts.push(artifact);
            }

            if spec.name == config.route_kind && desc.is_child {
                artifacts.extend(self.wire_route(desc, spec)?);
            } else if spec.name == config.config_kind {
                artifacts.extend(scaffold::ensure_ancestor_configs(
                    self.ws,
                    self.reporter,
                    &desc.path,
                )?);
                flags::register_flag(self.ws, self.reporter, desc)?;
            } else if spec.name == config.locale_kind {
                artifacts.extend(scaffold::ensure_ancestor_locales(
                    self.ws,
                    self.reporter,
                    &desc.path,
                )?);
            }
        }

        Ok(artifacts)
    }

    fn generate_one(
        &self,
        desc: &ModuleDescriptor,
        spec: &KindSpec,
        locale: &str,
        overwrite: bool,
    ) -> Result<GeneratedArtifact> {
        let path = self.ws.artifact_path(desc, spec, locale);
        let existed = path.exists();

        if existed && !overwrite {
            tracing::debug!(path = %path.display(), "exists, skipping");
            return Ok(GeneratedArtifact {
                kind: spec.name.clone(),
                file_path: path,
                status: ArtifactStatus::Skipped(SkipReason::Exists),
                existed_before: true,
            });
        }

        let vars = TemplateVars::for_module(desc, self.ws.config(), locale);
        let rendered = self.ws.templates().render(&spec.template_name(), &vars)?;
        write_artifact(&spec.name, &path, rendered, existed)
    }

    fn wire_route(&self, desc: &ModuleDescriptor, spec: &KindSpec) -> Result<Vec<GeneratedArtifact>> {
        let leaf = self.ws.artifact_path(desc, spec, self.ws.default_locale());
        wire_into_parent(self.ws, self.reporter, &desc.path, &leaf)
    }
}

/// Materialize ancestors, link them shallow to deep, then link `leaf` into
/// the direct parent of `path`
pub(crate) fn wire_into_parent(
    ws: &Workspace,
    reporter: &dyn Reporter,
    path: &ModulePath,
    leaf: &Path,
) -> Result<Vec<GeneratedArtifact>> {
    let created = scaffold::ensure_ancestor_routes(ws, reporter, path)?;

    for ancestor in path.ancestors() {
        let Some(parent) = ancestor.parent() else {
            continue;
        };
        if let Some(file) = ws.find_route_file(&ancestor) {
            link_file(ws, reporter, &parent, &file)?;
        }
    }

    if let Some(parent) = path.parent() {
        if leaf.is_file() {
            link_file(ws, reporter, &parent, leaf)?;
        } else {
            tracing::debug!(path = %leaf.display(), "route artifact not written, nothing to link");
        }
    }

    Ok(created)
}

fn link_file(ws: &Workspace, reporter: &dyn Reporter, parent: &ModulePath, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    match route_exports(&content, file, ws.config())?.link_ident() {
        Some(ident) => {
            link::link_child(ws, reporter, parent, &ident, file)?;
        }
        None => reporter.warn(LinkWarning::RouteExportMissing(file.to_path_buf())),
    }
    Ok(())
}

/// Write a rendered artifact, creating parent directories
pub(crate) fn write_artifact(
    kind: &str,
    path: &Path,
    rendered: Rendered,
    existed: bool,
) -> Result<GeneratedArtifact> {
    let status = match rendered {
        Rendered::Skip => ArtifactStatus::Skipped(SkipReason::Template),
        Rendered::Content(content) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            if existed {
                ArtifactStatus::Overwritten
            } else {
                ArtifactStatus::Created
            }
        }
    };

    Ok(GeneratedArtifact {
        kind: kind.to_string(),
        file_path: path.to_path_buf(),
        status,
        existed_before: existed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::report::CollectingReporter;
    use std::fs;

    const REGISTRY: &str = "export const FEATURE_FLAGS = {\n  // @feature-flags:start\n  // @feature-flags:end\n};\n";

    fn kinds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn setup() -> (tempfile::TempDir, Workspace) {
        let temp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(temp.path().to_path_buf(), GeneratorConfig::default());
        (temp, ws)
    }

    fn route_files(ws: &Workspace) -> Vec<PathBuf> {
        crate::routes::discover_route_files(ws).unwrap()
    }

    #[test]
    fn test_child_route_scenario() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let desc = ModuleDescriptor::new(ws.normalize("reports/monthly").unwrap());

        let artifacts = Generator::new(&ws, &reporter)
            .generate(&desc, &kinds(&["route"]), false)
            .unwrap();
        assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());
        assert_eq!(artifacts.iter().filter(|a| a.written()).count(), 2);

        let parent = ws.normalize("reports").unwrap();
        let parent_file = ws.route_file(&parent).unwrap();
        let content = fs::read_to_string(&parent_file).unwrap();
        assert_eq!(content.matches("...reportsMonthlyChildRoutes,").count(), 1);
        assert_eq!(content.matches("...").count(), 1);
        assert!(content.contains(
            "import { reportsMonthlyChildRoutes } from '../modules/monthly/routes/reports-monthly.routes';"
        ));
        assert!(!content.contains("@child-module"));

        let child = fs::read_to_string(ws.route_file(&desc.path).unwrap()).unwrap();
        assert!(child.contains("// @child-module"));
    }

    #[test]
    fn test_repeated_generate_is_idempotent() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let desc = ModuleDescriptor::new(ws.normalize("reports/monthly").unwrap());
        let generator = Generator::new(&ws, &reporter);

        generator.generate(&desc, &kinds(&["route"]), false).unwrap();
        let parent_file = ws.route_file(&ws.normalize("reports").unwrap()).unwrap();
        let first = fs::read_to_string(&parent_file).unwrap();

        let second_run = generator.generate(&desc, &kinds(&["route"]), false).unwrap();
        assert!(second_run
            .iter()
            .all(|a| a.status == ArtifactStatus::Skipped(SkipReason::Exists)));
        assert_eq!(fs::read_to_string(&parent_file).unwrap(), first);
    }

    #[test]
    fn test_deep_module_materializes_each_ancestor() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let desc = ModuleDescriptor::new(ws.normalize("a/b/c/d").unwrap());

        Generator::new(&ws, &reporter)
            .generate(&desc, &kinds(&["route"]), false)
            .unwrap();
        assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());
        assert_eq!(route_files(&ws).len(), 4);

        for (parent, child) in [("a", "aBChildRoutes"), ("a/b", "aBCChildRoutes"), ("a/b/c", "aBCDChildRoutes")] {
            let file = ws.route_file(&ws.normalize(parent).unwrap()).unwrap();
            let content = fs::read_to_string(file).unwrap();
            assert_eq!(content.matches("...").count(), 1, "{}", parent);
            assert!(content.contains(&format!("...{},", child)), "{}", parent);
        }
    }

    #[test]
    fn test_unknown_kind_warns_and_continues() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let desc = ModuleDescriptor::new(ws.normalize("billing").unwrap());

        let artifacts = Generator::new(&ws, &reporter)
            .generate(&desc, &kinds(&["widget", "page"]), false)
            .unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(reporter.warnings(), vec![LinkWarning::UnknownKind("widget".to_string())]);
    }

    #[test]
    fn test_template_skip_and_overwrite() {
        let (_temp, ws) = setup();
        let reporter = CollectingReporter::new();
        let child = ModuleDescriptor::new(ws.normalize("reports/monthly").unwrap());
        let generator = Generator::new(&ws, &reporter);

        let skipped = generator.generate(&child, &kinds(&["context"]), false).unwrap();
        assert_eq!(skipped[0].status, ArtifactStatus::Skipped(SkipReason::Template));
        assert!(!skipped[0].file_path.exists());

        let root = ModuleDescriptor::new(ws.normalize("reports").unwrap());
        let first = generator.generate(&root, &kinds(&["page"]), false).unwrap();
        assert_eq!(first[0].status, ArtifactStatus::Created);
        let again = generator.generate(&root, &kinds(&["page"]), true).unwrap();
        assert_eq!(again[0].status, ArtifactStatus::Overwritten);
        assert!(again[0].existed_before);
    }

    #[test]
    fn test_config_registers_flags_for_module_and_ancestors() {
        let (temp, ws) = setup();
        let registry = temp.path().join("src/config/feature-flags.ts");
        fs::create_dir_all(registry.parent().unwrap()).unwrap();
        fs::write(&registry, REGISTRY).unwrap();

        let reporter = CollectingReporter::new();
        let desc = ModuleDescriptor::new(ws.normalize("reports/monthly").unwrap());
        Generator::new(&ws, &reporter)
            .generate(&desc, &kinds(&["config", "locale"]), false)
            .unwrap();

        let content = fs::read_to_string(&registry).unwrap();
        assert!(content.contains("  REPORTS: {"));
        assert!(content.contains("  REPORTS_MONTHLY: {"));
        assert!(ws.module_dir(&ws.normalize("reports").unwrap()).join("reports.config.ts").is_file());
        assert!(ws.module_dir(&ws.normalize("reports").unwrap()).join("locales/en.json").is_file());
        assert!(ws.module_dir(&desc.path).join("locales/en.json").is_file());
    }

    #[test]
    fn test_template_error_keeps_earlier_files() {
        let (temp, ws) = setup();
        let templates = temp.path().join(".modsync/templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("store.ts.tpl"), "{{doesNotExist}}").unwrap();

        let reporter = CollectingReporter::new();
        let desc = ModuleDescriptor::new(ws.normalize("billing").unwrap());
        let err = Generator::new(&ws, &reporter)
            .generate(&desc, &kinds(&["page", "store"]), false)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("doesNotExist"));
        assert!(ws.module_dir(&desc.path).join("components/pages/BillingPage.tsx").is_file());
    }
}
