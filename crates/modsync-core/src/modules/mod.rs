//! Module paths, descriptors and the per-project workspace context

pub mod path;

pub use path::{child_export_name, ModuleDescriptor, ModulePath};

use crate::config::{expand_file_name, FileNameVars, GeneratorConfig, KindSpec};
use crate::templates::TemplateSet;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A project root plus the configuration and templates every component reads
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: GeneratorConfig,
    templates: TemplateSet,
}

impl Workspace {
    pub fn new(root: PathBuf, config: GeneratorConfig) -> Self {
        let templates = TemplateSet::new(root.join(&config.templates_dir));
        Self {
            root,
            config,
            templates,
        }
    }

    /// Load `modsync.yaml` (or defaults) for the project at `root`
    pub fn load(root: PathBuf, config_file: &str) -> Result<Self> {
        let config = GeneratorConfig::load(&root, config_file)?;
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn normalize(&self, raw: &str) -> Result<ModulePath, crate::error::ValidationError> {
        ModulePath::normalize(raw, &self.config)
    }

    pub fn module_dir(&self, path: &ModulePath) -> PathBuf {
        path.base_path(&self.root, &self.config)
    }

    pub fn source_root(&self) -> PathBuf {
        self.root.join(&self.config.source_root)
    }

    /// File an artifact of `kind` lands in for `desc`
    pub fn artifact_path(&self, desc: &ModuleDescriptor, kind: &KindSpec, locale: &str) -> PathBuf {
        let pascal = desc.pascal_name();
        let camel = desc.camel_name();
        let file_name = expand_file_name(
            &kind.file_name,
            FileNameVars {
                id: &desc.module_id,
                pascal: &pascal,
                camel: &camel,
                name: desc.path.name(),
                locale,
            },
        );

        let mut dir = self.module_dir(&desc.path);
        if !kind.dir.is_empty() {
            dir.push(&kind.dir);
        }
        dir.join(file_name)
    }

    /// Conventional route artifact location for a module
    pub fn route_file(&self, path: &ModulePath) -> Option<PathBuf> {
        let spec = self.config.route_spec()?;
        let desc = ModuleDescriptor::new(path.clone());
        Some(self.artifact_path(&desc, spec, self.default_locale()))
    }

    /// Directory holding a module's route artifacts
    pub fn routes_dir(&self, path: &ModulePath) -> PathBuf {
        let mut dir = self.module_dir(path);
        if let Some(spec) = self.config.route_spec() {
            if !spec.dir.is_empty() {
                dir.push(&spec.dir);
            }
        }
        dir
    }

    /// Locate a module's existing route artifact
    ///
    /// Tries the naming convention first, then the single route file in the
    /// module's routes directory (modules that were moved keep their original
    /// file name).
    pub fn find_route_file(&self, path: &ModulePath) -> Option<PathBuf> {
        if let Some(conventional) = self.route_file(path) {
            if conventional.is_file() {
                return Some(conventional);
            }
        }

        let dir = self.routes_dir(path);
        let entries = std::fs::read_dir(&dir).ok()?;
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| crate::config::matches_any(n, &self.config.route_file_patterns))
            })
            .collect();

        if candidates.len() == 1 {
            candidates.pop()
        } else {
            None
        }
    }

    pub fn default_locale(&self) -> &str {
        self.config.locales.first().map(String::as_str).unwrap_or("en")
    }
}
