//! Version comparison between the running CLI and the project's requirement
//!
//! `min_cli_version` is either a bare version (`0.2.0`, `v0.2.0`), read as a
//! minimum, or a semver requirement such as `>=0.2, <0.4`.

use anyhow::Result;
use semver::{Version, VersionReq};

/// What a project's `min_cli_version` asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliRequirement {
    AtLeast(Version),
    Matching(VersionReq),
}

impl CliRequirement {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if let Ok(version) = parse_version(trimmed) {
            return Ok(Self::AtLeast(version));
        }
        VersionReq::parse(trimmed)
            .map(Self::Matching)
            .map_err(|e| anyhow::anyhow!("Invalid min_cli_version '{}': {}", raw, e))
    }

    pub fn is_satisfied_by(&self, cli: &Version) -> bool {
        match self {
            // Plain ordering, so a pre-release sorts below its release
            Self::AtLeast(min) => cli >= min,
            Self::Matching(req) => req.matches(cli),
        }
    }
}

/// Compare the running CLI version against the project's `min_cli_version`
/// Returns a warning message if the CLI does not satisfy it
pub fn check_compatibility(
    cli_version: &str,
    min_cli_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let Ok(cli) = parse_version(cli_version) else {
        tracing::debug!(cli_version, "unparseable CLI version, skipping check");
        return None;
    };
    let Ok(requirement) = CliRequirement::parse(min_cli_version) else {
        tracing::debug!(min_cli_version, "unparseable min_cli_version, skipping check");
        return None;
    };

    if requirement.is_satisfied_by(&cli) {
        return None;
    }

    let wanted = match &requirement {
        CliRequirement::AtLeast(min) => format!("modsync {} or newer", min),
        CliRequirement::Matching(req) => format!("modsync {}", req),
    };
    Some(format!(
        "This project expects {}, you are running {}. Consider updating: {}",
        wanted, cli_version, upgrade_command
    ))
}

/// Parse version string, handling a leading 'v'
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim().strip_prefix('v').unwrap_or(version_str.trim());
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPGRADE: &str = "cargo install modsync --force";

    #[test]
    fn test_cli_older_than_project() {
        let warning = check_compatibility("0.1.0", "0.2.0", UPGRADE).unwrap();
        assert!(warning.contains("modsync 0.2.0 or newer"));
        assert!(warning.contains(UPGRADE));
    }

    #[test]
    fn test_cli_same_as_project() {
        assert!(check_compatibility("0.1.0", "0.1.0", UPGRADE).is_none());
    }

    #[test]
    fn test_leading_v_and_whitespace_are_accepted() {
        assert!(check_compatibility("0.1.0", "  v0.3.0\n", UPGRADE).is_some());
        assert!(check_compatibility("0.3.0", " v0.3.0 ", UPGRADE).is_none());
    }

    #[test]
    fn test_prerelease_cli_is_below_its_release() {
        assert!(check_compatibility("0.2.0-beta.1", "0.2.0", UPGRADE).is_some());
        assert!(check_compatibility("0.2.0", "0.2.0-rc.1", UPGRADE).is_none());
    }

    #[test]
    fn test_bare_version_is_a_minimum_not_a_caret() {
        // "^0.2.0" would reject 0.3.0
        assert!(check_compatibility("0.3.0", "0.2.0", UPGRADE).is_none());
        assert!(check_compatibility("1.0.0", "0.2.0", UPGRADE).is_none());
    }

    #[test]
    fn test_requirement_ranges() {
        assert_eq!(
            CliRequirement::parse(">=0.2, <0.4").unwrap(),
            CliRequirement::Matching(VersionReq::parse(">=0.2, <0.4").unwrap())
        );
        assert!(check_compatibility("0.3.1", ">=0.2, <0.4", UPGRADE).is_none());
        let warning = check_compatibility("0.4.0", ">=0.2, <0.4", UPGRADE).unwrap();
        assert!(warning.contains("modsync >=0.2, <0.4"));
    }

    #[test]
    fn test_invalid_versions() {
        assert!(check_compatibility("invalid", "0.1.0", UPGRADE).is_none());
        assert!(check_compatibility("0.1.0", "soon", UPGRADE).is_none());
        assert!(CliRequirement::parse("soon").is_err());
    }
}
