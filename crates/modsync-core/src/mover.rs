//! Module relocation
//!
//! A move runs through a fixed sequence of states. Everything up to and
//! including the destination check happens before the first write; once the
//! directory has been renamed, each remaining step is best effort and reports
//! a warning instead of aborting.

use crate::error::{LinkWarning, ValidationError};
use crate::generate::wire_into_parent;
use crate::modules::{child_export_name, ModulePath, Workspace};
use crate::report::Reporter;
use crate::routes::link::{apply_edits, unlink_child, whole_line_delete, TextEdit};
use crate::routes::syntax::{self, Dialect};
use crate::routes::tree::is_skipped_dir;
use crate::routes::route_exports;
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Steps of a move, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MoveState {
    Validate,
    ResolveTarget,
    Confirm,
    ScanReferences,
    UnlinkOldParent,
    MoveDirectory,
    RewriteReferences,
    RelinkNewParent,
    Cleanup,
    Done,
}

impl MoveState {
    pub fn next(self) -> Option<MoveState> {
        use MoveState::*;
        match self {
            Validate => Some(ResolveTarget),
            ResolveTarget => Some(Confirm),
            Confirm => Some(ScanReferences),
            ScanReferences => Some(UnlinkOldParent),
            UnlinkOldParent => Some(MoveDirectory),
            MoveDirectory => Some(RewriteReferences),
            RewriteReferences => Some(RelinkNewParent),
            RelinkNewParent => Some(Cleanup),
            Cleanup => Some(Done),
            Done => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MoveState::Validate => "validate",
            MoveState::ResolveTarget => "resolve target",
            MoveState::Confirm => "confirm",
            MoveState::ScanReferences => "scan references",
            MoveState::UnlinkOldParent => "unlink old parent",
            MoveState::MoveDirectory => "move directory",
            MoveState::RewriteReferences => "rewrite references",
            MoveState::RelinkNewParent => "relink new parent",
            MoveState::Cleanup => "cleanup",
            MoveState::Done => "done",
        }
    }
}

impl fmt::Display for MoveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated move, ready for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub source: ModulePath,
    pub target: ModulePath,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub old_alias: String,
    pub new_alias: String,
    /// Source lives below another module
    pub was_child: bool,
    /// Target lives below another module
    pub becomes_child: bool,
    /// True when no target was given and the module is promoted to the root
    pub promoted: bool,
}

/// What an executed move changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub unlinked_from: Option<PathBuf>,
    pub rewritten: Vec<PathBuf>,
    pub marker_changed: bool,
    pub relinked: bool,
    pub pruned: Option<PathBuf>,
    pub completed: Vec<MoveState>,
}

/// Validate and resolve a move; nothing is written
///
/// Without a target the module is promoted to the root under its own name.
pub fn plan_move(ws: &Workspace, source: &str, target: Option<&str>) -> Result<MovePlan, ValidationError> {
    let source = ws.normalize(source)?;
    let source_dir = ws.module_dir(&source);
    if !source_dir.is_dir() {
        return Err(ValidationError::SourceMissing(source.to_string(), source_dir));
    }

    let (target, promoted) = match target {
        Some(raw) => (ws.normalize(raw)?, false),
        None => {
            if source.is_root() {
                return Err(ValidationError::AlreadyAtRoot(source.to_string()));
            }
            let promoted = ModulePath::from_segments(vec![source.name().to_string()])
                .ok_or_else(|| ValidationError::EmptyPath(source.to_string()))?;
            (promoted, true)
        }
    };

    if target == source {
        return Err(ValidationError::SameLocation(source.to_string()));
    }
    if target.is_within(&source) {
        return Err(ValidationError::IntoOwnSubtree {
            source_path: source.to_string(),
            target: target.to_string(),
        });
    }

    let target_dir = ws.module_dir(&target);
    if target_dir.exists() {
        return Err(ValidationError::DestinationExists(target_dir));
    }

    let config = ws.config();
    Ok(MovePlan {
        old_alias: source.alias(config),
        new_alias: target.alias(config),
        was_child: !source.is_root(),
        becomes_child: !target.is_root(),
        source,
        target,
        source_dir,
        target_dir,
        promoted,
    })
}

/// Files under the source root that reference the module's alias
pub async fn scan_references(ws: &Workspace, plan: &MovePlan) -> Result<Vec<PathBuf>> {
    let root = ws.source_root();
    let skip_dirs = ws.config().skip_dirs.clone();
    let alias = plan.old_alias.clone();

    tokio::task::spawn_blocking(move || find_references(&root, &skip_dirs, &alias))
        .await
        .context("Reference scan task failed")?
}

fn find_references(root: &Path, skip_dirs: &[String], alias: &str) -> Result<Vec<PathBuf>> {
    let pattern = alias_pattern(alias);
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e.path(), e.file_type().is_dir(), skip_dirs));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        // Non-UTF-8 files cannot hold an import specifier we could rewrite
        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            tracing::debug!(path = %entry.path().display(), "skipping unreadable file");
            continue;
        };
        if pattern.is_match(&content) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

/// The alias followed by a character that cannot continue a segment
fn alias_pattern(alias: &str) -> Regex {
    Regex::new(&format!(r"({})([^A-Za-z0-9_\-]|$)", regex::escape(alias)))
        .expect("escaped pattern is valid")
}

fn rewrite_alias(content: &str, old_alias: &str, new_alias: &str) -> Option<String> {
    let pattern = alias_pattern(old_alias);
    if !pattern.is_match(content) {
        return None;
    }
    let replaced = pattern.replace_all(content, |caps: &Captures<'_>| format!("{}{}", new_alias, &caps[2]));
    Some(replaced.into_owned())
}

/// Carry out a confirmed plan against the scanned reference list
pub fn execute_move(
    ws: &Workspace,
    reporter: &dyn Reporter,
    plan: &MovePlan,
    references: &[PathBuf],
) -> Result<MoveReport> {
    let mut report = MoveReport {
        completed: vec![
            MoveState::Validate,
            MoveState::ResolveTarget,
            MoveState::Confirm,
            MoveState::ScanReferences,
        ],
        ..MoveReport::default()
    };

    // The tree may have changed while the user was confirming
    if plan.target_dir.exists() {
        return Err(ValidationError::DestinationExists(plan.target_dir.clone()).into());
    }

    let mut state = MoveState::UnlinkOldParent;
    loop {
        tracing::debug!(%state, source = %plan.source, target = %plan.target, "move step");
        match state {
            MoveState::UnlinkOldParent => {
                if plan.was_child {
                    report.unlinked_from = unlink_old_parent(ws, reporter, plan);
                }
            }
            MoveState::MoveDirectory => move_directory(plan)?,
            MoveState::RewriteReferences => {
                report.rewritten = rewrite_references(reporter, plan, references);
            }
            MoveState::RelinkNewParent => relink(ws, reporter, plan, &mut report),
            MoveState::Cleanup => {
                if plan.was_child {
                    report.pruned = prune_old_parent(reporter, plan);
                }
            }
            _ => {}
        }
        report.completed.push(state);
        match state.next() {
            Some(next) => state = next,
            None => break,
        }
    }

    Ok(report)
}

fn step_warning(reporter: &dyn Reporter, state: MoveState, err: anyhow::Error) {
    reporter.warn(LinkWarning::MoveStep {
        step: state.label(),
        detail: format!("{:#}", err),
    });
}

fn unlink_old_parent(ws: &Workspace, reporter: &dyn Reporter, plan: &MovePlan) -> Option<PathBuf> {
    let parent = plan.source.parent()?;
    let parent_file = ws.find_route_file(&parent)?;
    let own_file = ws.find_route_file(&plan.source)?;

    let result = std::fs::read_to_string(&own_file)
        .with_context(|| format!("Failed to read {}", own_file.display()))
        .and_then(|content| route_exports(&content, &own_file, ws.config()))
        .and_then(|exports| match exports.link_ident() {
            Some(ident) => unlink_child(&parent_file, &ident),
            None => Ok(false),
        });

    match result {
        Ok(true) => Some(parent_file),
        Ok(false) => None,
        Err(err) => {
            step_warning(reporter, MoveState::UnlinkOldParent, err);
            None
        }
    }
}

fn move_directory(plan: &MovePlan) -> Result<()> {
    if let Some(parent) = plan.target_dir.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::rename(&plan.source_dir, &plan.target_dir).with_context(|| {
        format!(
            "Failed to move {} to {}",
            plan.source_dir.display(),
            plan.target_dir.display()
        )
    })
}

fn rewrite_references(reporter: &dyn Reporter, plan: &MovePlan, references: &[PathBuf]) -> Vec<PathBuf> {
    let mut rewritten = Vec::new();
    for file in references {
        if file.starts_with(&plan.source_dir) {
            continue;
        }
        let result = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))
            .and_then(|content| match rewrite_alias(&content, &plan.old_alias, &plan.new_alias) {
                Some(updated) => std::fs::write(file, updated)
                    .with_context(|| format!("Failed to write {}", file.display()))
                    .map(|_| true),
                None => Ok(false),
            });
        match result {
            Ok(true) => rewritten.push(file.clone()),
            Ok(false) => {}
            Err(err) => step_warning(reporter, MoveState::RewriteReferences, err),
        }
    }
    rewritten
}

fn relink(ws: &Workspace, reporter: &dyn Reporter, plan: &MovePlan, report: &mut MoveReport) {
    let Some(file) = ws.find_route_file(&plan.target) else {
        tracing::debug!(target = %plan.target, "moved module has no route artifact");
        return;
    };

    let updated = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))
        .and_then(|content| {
            let next = set_child_role(&content, &file, ws, plan.becomes_child)?;
            Ok((content, next))
        });

    match updated {
        Ok((_, None)) => {
            reporter.warn(LinkWarning::RouteExportMissing(file.clone()));
            return;
        }
        Ok((content, Some(next))) => {
            if next != content {
                if let Err(err) = std::fs::write(&file, &next)
                    .with_context(|| format!("Failed to write {}", file.display()))
                {
                    step_warning(reporter, MoveState::RelinkNewParent, err);
                    return;
                }
                report.marker_changed = true;
            }
        }
        Err(err) => {
            step_warning(reporter, MoveState::RelinkNewParent, err);
            return;
        }
    }

    if plan.becomes_child {
        match wire_into_parent(ws, reporter, &plan.target, &file) {
            Ok(_) => report.relinked = true,
            Err(err) => step_warning(reporter, MoveState::RelinkNewParent, err),
        }
    }
}

/// Add or remove the child marker line and child export of a route artifact
///
/// Returns `None` when the file has no route constructor export to alias.
pub(crate) fn set_child_role(
    content: &str,
    file: &Path,
    ws: &Workspace,
    child: bool,
) -> Result<Option<String>> {
    let config = ws.config();
    let exports = route_exports(content, file, config)?;
    let Some(main) = exports.main else {
        return Ok(None);
    };
    let marker = config.child_marker.trim();
    let tree = syntax::parse(content, Dialect::for_path(file))?;
    let mut edits = Vec::new();

    if child {
        if !exports.has_child_marker {
            edits.push(match syntax::imports(&tree, content).last() {
                Some(last) => TextEdit::insert(last.end_byte, format!("\n{}", marker)),
                None => TextEdit::insert(0, format!("{}\n", marker)),
            });
        }
        if exports.child.is_none() {
            let separator = if content.ends_with('\n') { "\n" } else { "\n\n" };
            edits.push(TextEdit::insert(
                content.len(),
                format!(
                    "{}export const {} = {};\n",
                    separator,
                    child_export_name(&main),
                    main
                ),
            ));
        }
        return Ok(Some(apply_edits(content, edits)));
    }

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim() == marker {
            edits.push(TextEdit::delete(offset, offset + line.len()));
        }
        offset += line.len();
    }

    if let Some(child_name) = &exports.child {
        let statement = syntax::exported_consts(&tree, content)
            .into_iter()
            .find(|(name, _)| name == child_name)
            .and_then(|(_, value)| {
                let mut node = value;
                while node.kind() != "export_statement" {
                    node = node.parent()?;
                }
                Some(node)
            });
        if let Some(statement) = statement {
            edits.push(whole_line_delete(content, statement.start_byte(), statement.end_byte()));
        }
    }

    if edits.is_empty() {
        return Ok(Some(content.to_string()));
    }
    let updated = apply_edits(content, edits);
    Ok(Some(format!("{}\n", updated.trim_end())))
}

fn prune_old_parent(reporter: &dyn Reporter, plan: &MovePlan) -> Option<PathBuf> {
    let container = plan.source_dir.parent()?;
    match std::fs::read_dir(container) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                return None;
            }
        }
        Err(_) => return None,
    }

    match std::fs::remove_dir(container) {
        Ok(()) => Some(container.to_path_buf()),
        Err(err) => {
            step_warning(
                reporter,
                MoveState::Cleanup,
                anyhow::Error::new(err).context(format!("Failed to remove {}", container.display())),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generate::Generator;
    use crate::modules::ModuleDescriptor;
    use crate::report::CollectingReporter;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Workspace) {
        let temp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(temp.path().to_path_buf(), GeneratorConfig::default());
        (temp, ws)
    }

    fn generate_route(ws: &Workspace, raw: &str) {
        let reporter = CollectingReporter::new();
        let desc = ModuleDescriptor::new(ws.normalize(raw).unwrap());
        Generator::new(ws, &reporter)
            .generate(&desc, &["route".to_string()], false)
            .unwrap();
    }

    async fn run_move(ws: &Workspace, source: &str, target: Option<&str>) -> (MoveReport, CollectingReporter) {
        let reporter = CollectingReporter::new();
        let plan = plan_move(ws, source, target).unwrap();
        let refs = scan_references(ws, &plan).await.unwrap();
        let report = execute_move(ws, &reporter, &plan, &refs).unwrap();
        (report, reporter)
    }

    #[test]
    fn test_state_order() {
        let mut state = MoveState::Validate;
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            assert!(next > state);
            seen.push(next);
            state = next;
        }
        assert_eq!(seen.len(), 10);
        assert_eq!(seen.last(), Some(&MoveState::Done));
    }

    #[test]
    fn test_plan_validation_errors() {
        let (_temp, ws) = setup();
        generate_route(&ws, "reports/monthly");
        generate_route(&ws, "billing");

        assert!(matches!(plan_move(&ws, "missing", None), Err(ValidationError::SourceMissing(..))));
        assert!(matches!(plan_move(&ws, "billing", None), Err(ValidationError::AlreadyAtRoot(_))));
        assert!(matches!(
            plan_move(&ws, "reports", Some("reports/monthly/deep")),
            Err(ValidationError::IntoOwnSubtree { .. })
        ));
        assert!(matches!(plan_move(&ws, "billing", Some("Billing")), Err(ValidationError::SameLocation(_))));
        assert!(matches!(
            plan_move(&ws, "billing", Some("reports")),
            Err(ValidationError::DestinationExists(_))
        ));
        assert!(matches!(
            plan_move(&ws, "billing", Some("modules/x")),
            Err(ValidationError::RestrictedSegment { .. })
        ));
    }

    #[test]
    fn test_plan_promotes_to_root() {
        let (_temp, ws) = setup();
        generate_route(&ws, "reports/monthly");

        let plan = plan_move(&ws, "reports/monthly", None).unwrap();
        assert!(plan.promoted);
        assert_eq!(plan.target.to_string(), "monthly");
        assert_eq!(plan.old_alias, "@modules/reports/monthly");
        assert_eq!(plan.new_alias, "@modules/monthly");
        assert!(plan.was_child);
        assert!(!plan.becomes_child);
    }

    #[test]
    fn test_alias_boundaries() {
        let content = "import a from '@modules/reports';\nimport b from '@modules/reports/hooks';\nimport c from '@modules/reports-old';\nimport d from '@modules/reportsX';\n";
        let out = rewrite_alias(content, "@modules/reports", "@modules/insights").unwrap();
        assert!(out.contains("'@modules/insights'"));
        assert!(out.contains("'@modules/insights/hooks'"));
        assert!(out.contains("'@modules/reports-old'"));
        assert!(out.contains("'@modules/reportsX'"));
        assert_eq!(rewrite_alias("no refs", "@modules/reports", "@modules/x"), None);
        assert!(alias_pattern("@modules/a").is_match("x @modules/a"));
    }

    #[tokio::test]
    async fn test_move_rewrites_every_external_reference() {
        let (temp, ws) = setup();
        generate_route(&ws, "reports");

        let src = temp.path().join("src");
        fs::create_dir_all(src.join("pages")).unwrap();
        fs::create_dir_all(src.join("node_modules/pkg")).unwrap();
        fs::write(src.join("pages/Home.tsx"), "import { a } from '@modules/reports';\nimport { b } from '@modules/reports/hooks';\n").unwrap();
        fs::write(src.join("pages/Other.tsx"), "import { c } from '@modules/reports-old';\n").unwrap();
        fs::write(src.join("pages/Menu.ts"), "export const link = \"@modules/reports\";\n").unwrap();
        fs::write(src.join("node_modules/pkg/index.js"), "'@modules/reports'\n").unwrap();
        let internal = ws.module_dir(&ws.normalize("reports").unwrap()).join("index.ts");
        fs::write(&internal, "export * from '@modules/reports/hooks';\n").unwrap();

        let plan = plan_move(&ws, "reports", Some("insights")).unwrap();
        let refs = scan_references(&ws, &plan).await.unwrap();
        assert_eq!(refs.len(), 3, "{:?}", refs);

        let reporter = CollectingReporter::new();
        let report = execute_move(&ws, &reporter, &plan, &refs).unwrap();
        assert_eq!(report.rewritten.len(), 2);
        assert_eq!(report.completed.last(), Some(&MoveState::Done));
        assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());

        assert!(!plan.source_dir.exists());
        assert!(plan.target_dir.join("index.ts").is_file());

        let pattern = alias_pattern("@modules/reports");
        for file in ["pages/Home.tsx", "pages/Menu.ts", "pages/Other.tsx"] {
            let content = fs::read_to_string(src.join(file)).unwrap();
            assert!(!pattern.is_match(&content), "{}", file);
        }
        assert!(fs::read_to_string(src.join("pages/Home.tsx")).unwrap().contains("'@modules/insights/hooks'"));
        assert!(fs::read_to_string(src.join("pages/Other.tsx")).unwrap().contains("reports-old"));
        assert_eq!(fs::read_to_string(src.join("node_modules/pkg/index.js")).unwrap(), "'@modules/reports'\n");
    }

    #[tokio::test]
    async fn test_child_marker_round_trip() {
        let (_temp, ws) = setup();
        generate_route(&ws, "reports");
        generate_route(&ws, "billing");

        let reports_file = ws.route_file(&ws.normalize("reports").unwrap()).unwrap();
        let billing_file = ws.route_file(&ws.normalize("billing").unwrap()).unwrap();
        let original_parent = fs::read_to_string(&reports_file).unwrap();
        let original = fs::read_to_string(&billing_file).unwrap();
        assert!(!original.contains("@child-module"));

        let (report, reporter) = run_move(&ws, "billing", Some("reports/billing")).await;
        assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());
        assert!(report.marker_changed);
        assert!(report.relinked);

        let nested = ws.find_route_file(&ws.normalize("reports/billing").unwrap()).unwrap();
        let content = fs::read_to_string(&nested).unwrap();
        assert!(content.contains("// @child-module"));
        assert!(content.contains("export const billingChildRoutes = billingRoutes;"));
        let parent = fs::read_to_string(&reports_file).unwrap();
        assert!(parent.contains("...billingChildRoutes,"));
        assert!(parent.contains("from '../modules/billing/routes/billing.routes';"));

        let (report, reporter) = run_move(&ws, "reports/billing", None).await;
        assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());
        assert!(report.unlinked_from.is_some());
        assert!(report.pruned.is_some());

        assert_eq!(fs::read_to_string(&billing_file).unwrap(), original);
        assert_eq!(fs::read_to_string(&reports_file).unwrap(), original_parent);
        assert!(!ws.module_dir(&ws.normalize("reports").unwrap()).join("modules").exists());
    }

    #[tokio::test]
    async fn test_move_into_missing_parent_materializes_it() {
        let (_temp, ws) = setup();
        generate_route(&ws, "billing");

        let (report, reporter) = run_move(&ws, "billing", Some("finance/billing")).await;
        assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());
        assert!(report.relinked);

        let parent = ws.route_file(&ws.normalize("finance").unwrap()).unwrap();
        assert!(fs::read_to_string(parent).unwrap().contains("...billingChildRoutes,"));
    }

    #[test]
    fn test_destination_created_after_planning() {
        let (_temp, ws) = setup();
        generate_route(&ws, "billing");
        let plan = plan_move(&ws, "billing", Some("payments")).unwrap();
        fs::create_dir_all(&plan.target_dir).unwrap();

        let reporter = CollectingReporter::new();
        let err = execute_move(&ws, &reporter, &plan, &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::DestinationExists(_))
        ));
        assert!(plan.source_dir.is_dir());
    }
}
