//! Modsync Core - module and route synchronization for frontend projects
//!
//! Keeps a filesystem tree of feature modules consistent with the nested route
//! configuration that wires them together. Three operations are exposed:
//!
//! - **generate**: render a module's artifacts, materialize missing ancestors
//!   and link the new route export into its parent
//! - **move**: relocate a module, rewrite alias imports and relink its routes
//! - **visualize**: statically reconstruct the route tree from route files
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use modsync_core::{generate::Generator, report::StderrReporter, ModuleDescriptor, Workspace};
//!
//! let ws = Workspace::load(project_root, "modsync.yaml")?;
//! let desc = ModuleDescriptor::new(ws.normalize("reports/monthly")?);
//! let kinds = ws.config().expand_kinds(&["minimal".to_string()]);
//! Generator::new(&ws, &StderrReporter).generate(&desc, &kinds, false)?;
//! ```

pub mod config;
pub mod error;
pub mod flags;
pub mod generate;
pub mod modules;
pub mod mover;
pub mod product;
pub mod report;
pub mod routes;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::GeneratorConfig;
pub use error::{LinkWarning, ParseIssue, ValidationError};
pub use generate::{ArtifactStatus, GeneratedArtifact, Generator};
pub use modules::{ModuleDescriptor, ModulePath, Workspace};
pub use mover::{execute_move, plan_move, scan_references, MovePlan, MoveReport, MoveState};
pub use product::ProductConfig;
pub use report::{CollectingReporter, Reporter, StderrReporter};
pub use routes::{reconstruct, RouteTree};

#[cfg(feature = "tui")]
pub use tui::{run_generate, run_move, run_visualize, GenerateArgs, MoveArgs};
