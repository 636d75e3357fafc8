//! Charm-style CLI prompts using cliclack

use crate::error::LinkWarning;
use crate::generate::{ArtifactStatus, GeneratedArtifact, Generator, SkipReason};
use crate::modules::{ModuleDescriptor, Workspace};
use crate::mover::{self, MovePlan};
use crate::product::ProductConfig;
use crate::report::{Reporter, StderrReporter};
use crate::routes;
use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};

/// CLI arguments for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Module path such as `reports/monthly`; prompted when absent
    pub path: Option<String>,

    /// Artifact kinds (preset names are expanded)
    pub kinds: Option<Vec<String>>,

    /// Named preset from the project config
    pub preset: Option<String>,

    /// Generate a nested module as a standalone route tree
    pub standalone: bool,

    /// Replace artifacts that already exist
    pub overwrite: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// CLI arguments for the move command
#[derive(Debug, Clone, Default)]
pub struct MoveArgs {
    pub source: String,

    /// Destination path; without it the module is promoted to the root
    pub target: Option<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Reports warnings through cliclack's log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct TuiReporter;

impl Reporter for TuiReporter {
    fn warn(&self, warning: LinkWarning) {
        tracing::debug!(?warning, "link warning");
        let _ = cliclack::log::warning(warning.to_string());
    }

    fn info(&self, message: &str) {
        let _ = cliclack::log::step(message);
    }
}

/// Turn a cancelled prompt (Esc / Ctrl+C inside cliclack) into a clean exit
pub fn finish_cancelled(result: Result<()>) -> Result<()> {
    match result {
        Err(err)
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::Interrupted) =>
        {
            cliclack::outro_cancel("Cancelled.")?;
            Ok(())
        }
        other => other,
    }
}

/// Auto-confirmed runs without a terminal on stderr (CI, pipes) get plain lines
fn reporter_for(yes: bool) -> &'static dyn Reporter {
    if yes && !console::user_attended_stderr() {
        &StderrReporter
    } else {
        &TuiReporter
    }
}

fn open_workspace<C: ProductConfig>(
    product: &C,
    root: &Path,
    cli_version: &str,
    reporter: &dyn Reporter,
) -> Result<Workspace> {
    let ws = Workspace::load(root.to_path_buf(), product.config_file_name())?;
    if let Some(warning) = ws.config().outdated_cli(cli_version, product.upgrade_command()) {
        reporter.warn(warning);
    }
    Ok(ws)
}

/// Generate a module's artifacts with interactive prompts
pub async fn run_generate<C: ProductConfig>(
    product: &C,
    root: &Path,
    args: GenerateArgs,
    cli_version: &str,
) -> Result<()> {
    cliclack::intro(format!("{} generate", product.display_name()))?;
    let reporter = reporter_for(args.yes);
    let ws = open_workspace(product, root, cli_version, reporter)?;

    // Step 1: Module path
    let raw = match &args.path {
        Some(path) => path.clone(),
        None => cliclack::input("Module path")
            .placeholder("reports/monthly")
            .interact()?,
    };
    let mut desc = ModuleDescriptor::new(ws.normalize(&raw)?);
    if args.standalone {
        desc = desc.standalone();
    }
    cliclack::log::info(format!(
        "Module {} ({})",
        desc.path,
        if desc.is_child { "child route" } else { "standalone routes" }
    ))?;

    // Step 2: Kinds
    let kinds = select_kinds(&ws, &args)?;
    if kinds.is_empty() {
        anyhow::bail!("No artifact kinds selected.");
    }

    // Step 3: Confirm
    if !args.yes {
        let confirm: bool = cliclack::confirm(format!(
            "Generate {} for {}?",
            kinds.join(", "),
            desc.path
        ))
        .initial_value(true)
        .interact()?;
        if !confirm {
            cliclack::outro_cancel("Nothing generated.")?;
            return Ok(());
        }
    }

    // Step 4: Generate
    let artifacts = Generator::new(&ws, reporter).generate(&desc, &kinds, args.overwrite)?;
    print_artifacts(&ws, &artifacts)?;

    let written = artifacts.iter().filter(|a| a.written()).count();
    cliclack::outro(format!("{} files written", written))?;
    Ok(())
}

fn select_kinds(ws: &Workspace, args: &GenerateArgs) -> Result<Vec<String>> {
    let config = ws.config();

    if let Some(kinds) = &args.kinds {
        return Ok(config.expand_kinds(kinds));
    }

    if let Some(preset) = &args.preset {
        return match config.presets.get(preset) {
            Some(kinds) => Ok(kinds.clone()),
            None => {
                let available: Vec<&str> = config.presets.keys().map(String::as_str).collect();
                anyhow::bail!(
                    "Preset '{}' not found. Available presets: {}",
                    preset,
                    available.join(", ")
                )
            }
        };
    }

    if args.yes {
        let all = config.kinds.iter().map(|k| k.name.clone()).collect();
        return Ok(config.presets.get("full").cloned().unwrap_or(all));
    }

    let initial = config.presets.get("minimal").cloned().unwrap_or_default();
    let mut multi = cliclack::multiselect("Select artifacts to generate");
    for kind in &config.kinds {
        multi = multi.item(kind.name.clone(), &kind.name, &kind.description);
    }
    let selected: Vec<String> = multi.initial_values(initial).required(true).interact()?;
    Ok(selected)
}

fn print_artifacts(ws: &Workspace, artifacts: &[GeneratedArtifact]) -> Result<()> {
    for artifact in artifacts {
        let display = artifact
            .file_path
            .strip_prefix(ws.root())
            .unwrap_or(&artifact.file_path)
            .display();
        match artifact.status {
            ArtifactStatus::Created => cliclack::log::success(format!("created {}", display))?,
            ArtifactStatus::Overwritten => {
                cliclack::log::success(format!("overwritten {}", display))?
            }
            ArtifactStatus::Skipped(SkipReason::Exists) => {
                cliclack::log::remark(format!("exists {}", display))?
            }
            ArtifactStatus::Skipped(SkipReason::Template) => {
                cliclack::log::remark(format!("skipped {} ({})", display, artifact.kind))?
            }
        }
    }
    Ok(())
}

/// Move a module with interactive confirmation
pub async fn run_move<C: ProductConfig>(
    product: &C,
    root: &Path,
    args: MoveArgs,
    cli_version: &str,
) -> Result<()> {
    cliclack::intro(format!("{} move", product.display_name()))?;
    let reporter = reporter_for(args.yes);
    let ws = open_workspace(product, root, cli_version, reporter)?;

    // Step 1: Resolve the target
    let target = match args.target {
        Some(target) => Some(target),
        None if args.yes => None,
        None => resolve_target(&ws, &args.source)?,
    };
    let plan = mover::plan_move(&ws, &args.source, target.as_deref())?;
    describe_plan(&ws, &plan)?;

    // Step 2: Confirm
    if !args.yes {
        let confirm: bool = cliclack::confirm(format!("Move {} to {}?", plan.source, plan.target))
            .initial_value(false)
            .interact()?;
        if !confirm {
            cliclack::outro_cancel("Move cancelled.")?;
            return Ok(());
        }
    }

    // Step 3: Scan references
    let spinner = cliclack::spinner();
    spinner.start("Scanning references...");
    let references = mover::scan_references(&ws, &plan).await?;
    spinner.stop(format!(
        "Found {} files referencing {}",
        references.len(),
        plan.old_alias
    ));

    // Step 4: Move
    let report = mover::execute_move(&ws, reporter, &plan, &references)?;
    if let Some(parent) = &report.unlinked_from {
        cliclack::log::step(format!("Unlinked from {}", relative(&ws, parent).display()))?;
    }
    for file in &report.rewritten {
        cliclack::log::step(format!("Rewrote imports in {}", relative(&ws, file).display()))?;
    }
    if let Some(dir) = &report.pruned {
        cliclack::log::step(format!("Removed empty {}", relative(&ws, dir).display()))?;
    }

    cliclack::outro(format!("Moved {} to {}", plan.source, plan.target))?;
    Ok(())
}

/// Without an explicit target, promote to the root or ask for a path
fn resolve_target(ws: &Workspace, source: &str) -> Result<Option<String>> {
    let path = ws.normalize(source)?;
    if path.is_root() {
        let target: String = cliclack::input("Target module path")
            .placeholder("parent/name")
            .interact()?;
        return Ok(Some(target));
    }

    let action: &str = cliclack::select("Where should the module go?")
        .item("promote", format!("Promote to the root as '{}'", path.name()), "")
        .item("enter", "Enter a target path", "")
        .interact()?;

    match action {
        "enter" => {
            let target: String = cliclack::input("Target module path")
                .placeholder("parent/name")
                .interact()?;
            Ok(Some(target))
        }
        _ => Ok(None),
    }
}

fn describe_plan(ws: &Workspace, plan: &MovePlan) -> Result<()> {
    cliclack::log::info(format!(
        "{} -> {}\n{} -> {}",
        relative(ws, &plan.source_dir).display(),
        relative(ws, &plan.target_dir).display(),
        plan.old_alias,
        plan.new_alias
    ))?;
    Ok(())
}

fn relative(ws: &Workspace, path: &Path) -> PathBuf {
    path.strip_prefix(ws.root()).unwrap_or(path).to_path_buf()
}

/// Print the reconstructed route tree
pub async fn run_visualize<C: ProductConfig>(product: &C, root: &Path, cli_version: &str) -> Result<()> {
    cliclack::intro(format!("{} visualize", product.display_name()))?;
    let ws = open_workspace(product, root, cli_version, &TuiReporter)?;

    let spinner = cliclack::spinner();
    spinner.start("Parsing route files...");
    let tree = routes::reconstruct(&ws)?;
    spinner.stop(format!("Parsed {} route files", tree.files.len()));

    println!();
    println!("{}", tree.render());

    if !tree.issues.is_empty() {
        println!("{}", style(format!("{} issues", tree.issues.len())).yellow().bold());
        for issue in &tree.issues {
            cliclack::log::warning(issue.to_string())?;
        }
    }

    cliclack::outro(format!("{} routes", tree.node_count()))?;
    Ok(())
}
