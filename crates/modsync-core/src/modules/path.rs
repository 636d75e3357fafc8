//! Module path normalization and derived identifiers

use crate::config::GeneratorConfig;
use crate::error::ValidationError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A validated, normalized module path such as `reports/monthly`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// Normalize raw user input into a module path
    ///
    /// Splits on `/` or `\`, lowercases and hyphenates every segment, and drops
    /// empty segments. Fails if nothing is left or a segment is restricted.
    pub fn normalize(raw: &str, config: &GeneratorConfig) -> Result<Self, ValidationError> {
        let segments: Vec<String> = raw
            .split(['/', '\\'])
            .map(normalize_segment)
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(ValidationError::EmptyPath(raw.to_string()));
        }

        if let Some(segment) = segments.iter().find(|s| config.is_restricted(s)) {
            return Err(ValidationError::RestrictedSegment {
                raw: raw.to_string(),
                segment: segment.clone(),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment (the module's own name)
    pub fn name(&self) -> &str {
        // Non-empty by construction
        &self.segments[self.segments.len() - 1]
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    pub fn parent(&self) -> Option<ModulePath> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Every proper prefix, shallow to deep (the path itself excluded)
    pub fn ancestors(&self) -> Vec<ModulePath> {
        (1..self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// True if `self` equals `other` or lies below it
    pub fn is_within(&self, other: &ModulePath) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }

    pub fn module_id(&self) -> String {
        self.segments.join("-")
    }

    /// Alias string used by source files to import from this module
    pub fn alias(&self, config: &GeneratorConfig) -> String {
        format!("{}{}", config.alias_prefix, self.segments.join("/"))
    }

    /// Canonical directory: `<root>/<source_root>/modules/<a>/modules/<b>/...`
    pub fn base_path(&self, project_root: &Path, config: &GeneratorConfig) -> PathBuf {
        let mut path = project_root.join(&config.source_root);
        for segment in &self.segments {
            path.push(&config.modules_dir);
            path.push(segment);
        }
        path
    }

    /// Build a path from already-normalized segments (used for promotions)
    pub(crate) fn from_segments(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Lowercase a segment and turn separators and camel-case humps into single hyphens
fn normalize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_lower_or_digit = false;

    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() && prev_lower_or_digit {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower_or_digit = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower_or_digit = false;
        }
    }

    out.trim_matches('-').to_string()
}

/// Per-invocation description of the module being generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub path: ModulePath,
    pub is_child: bool,
    pub module_id: String,
    pub feature_flag_key: String,
}

impl ModuleDescriptor {
    /// Modules below the root are children of their parent unless made standalone
    pub fn new(path: ModulePath) -> Self {
        let is_child = !path.is_root();
        let module_id = path.module_id();
        let feature_flag_key = path
            .segments()
            .iter()
            .map(|s| s.to_uppercase().replace('-', "_"))
            .collect::<Vec<_>>()
            .join("_");

        Self {
            path,
            is_child,
            module_id,
            feature_flag_key,
        }
    }

    pub fn standalone(mut self) -> Self {
        self.is_child = false;
        self
    }

    pub fn pascal_name(&self) -> String {
        pascal_case(&self.module_id)
    }

    pub fn camel_name(&self) -> String {
        camel_case(&self.module_id)
    }

    /// Human title of the module's own segment
    pub fn title(&self) -> String {
        title_case(self.path.name())
    }

    /// Human description spanning every segment ("Reports Monthly")
    pub fn long_title(&self) -> String {
        self.path
            .segments()
            .iter()
            .map(|s| title_case(s))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn route_export(&self) -> String {
        format!("{}Routes", self.camel_name())
    }

    pub fn child_route_export(&self) -> String {
        child_export_name(&self.route_export())
    }

    /// Path declared by the module's top route entry
    pub fn route_path(&self) -> String {
        if self.is_child {
            self.path.name().to_string()
        } else {
            self.path.segments().join("/")
        }
    }
}

/// Child variant of a route export name (`fooRoutes` -> `fooChildRoutes`)
pub fn child_export_name(route_export: &str) -> String {
    match route_export.strip_suffix("Routes") {
        Some(stem) => format!("{}ChildRoutes", stem),
        None => format!("{}Child", route_export),
    }
}

pub fn pascal_case(id: &str) -> String {
    id.split(['-', '_', ' '])
        .filter(|p| !p.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn camel_case(id: &str) -> String {
    let pascal = pascal_case(id);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub fn title_case(segment: &str) -> String {
    segment
        .split(['-', '_', ' '])
        .filter(|p| !p.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
