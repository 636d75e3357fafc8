//! Feature flag registry
//!
//! The registry is a single source file with a map literal delimited by two
//! marker comments. Entries are inserted as text just above the end marker.

use crate::error::LinkWarning;
use crate::modules::{ModuleDescriptor, Workspace};
use crate::report::Reporter;
use anyhow::{Context, Result};
use regex::Regex;

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlagEntry {
    pub key: String,
    pub env_var: String,
    pub description: String,
    pub default_enabled: bool,
}

impl FeatureFlagEntry {
    pub fn for_module(desc: &ModuleDescriptor, env_prefix: &str) -> Self {
        Self {
            key: desc.feature_flag_key.clone(),
            env_var: format!("{}{}", env_prefix, desc.feature_flag_key),
            description: desc.long_title(),
            default_enabled: true,
        }
    }

    fn render(&self, indent: &str) -> String {
        format!(
            "{i}{key}: {{\n{i}  envVar: '{env}',\n{i}  description: '{desc}',\n{i}  defaultEnabled: {enabled},\n{i}}},\n",
            i = indent,
            key = self.key,
            env = self.env_var,
            desc = self.description.replace('\'', "\\'"),
            enabled = self.default_enabled,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagOutcome {
    Registered,
    AlreadyRegistered,
    /// Registry or markers missing; a warning was reported
    Skipped,
}

/// Register the module's feature flag in the shared registry
pub fn register_flag(
    ws: &Workspace,
    reporter: &dyn Reporter,
    desc: &ModuleDescriptor,
) -> Result<FlagOutcome> {
    let config = ws.config();
    let path = ws.root().join(&config.flag_registry);
    if !path.is_file() {
        reporter.warn(LinkWarning::FlagRegistryMissing(path));
        return Ok(FlagOutcome::Skipped);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entry = FeatureFlagEntry::for_module(desc, &config.env_prefix);

    match insert_entry(&content, &entry, &config.flag_start_marker, &config.flag_end_marker) {
        Insert::Present => Ok(FlagOutcome::AlreadyRegistered),
        Insert::NoMarkers => {
            reporter.warn(LinkWarning::FlagMarkersMissing(path));
            Ok(FlagOutcome::Skipped)
        }
        Insert::Updated(updated) => {
            std::fs::write(&path, updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            reporter.info(&format!("Registered feature flag {}", entry.key));
            Ok(FlagOutcome::Registered)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Insert {
    Present,
    NoMarkers,
    Updated(String),
}

fn insert_entry(content: &str, entry: &FeatureFlagEntry, start: &str, end: &str) -> Insert {
    // A key that is a prefix of another key (REPORTS vs REPORTS_MONTHLY) must not count
    let key_pattern = Regex::new(&format!(r#"(?m)^\s*['"]?{}['"]?\s*:"#, regex::escape(&entry.key)))
        .expect("escaped pattern is valid");
    if key_pattern.is_match(content) {
        return Insert::Present;
    }

    let Some(start_at) = content.find(start) else {
        return Insert::NoMarkers;
    };
    let Some(end_rel) = content[start_at + start.len()..].find(end) else {
        return Insert::NoMarkers;
    };
    let end_at = start_at + start.len() + end_rel;

    let line_start = content[..end_at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let indent: String = content[line_start..end_at]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();

    let mut updated = String::with_capacity(content.len() + 128);
    updated.push_str(&content[..line_start]);
    updated.push_str(&entry.render(&indent));
    updated.push_str(&content[line_start..]);
    Insert::Updated(updated)
}
