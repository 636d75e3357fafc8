//! Error and warning types
//!
//! Validation failures are fatal and always raised before anything is written.
//! Link warnings are non-fatal: the run continues in a partially-linked state and
//! the user repairs by hand or re-runs.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal input problems detected before any mutation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("module path '{0}' is empty after normalization")]
    EmptyPath(String),

    #[error("'{segment}' is a reserved directory name and cannot be used as a module segment (in '{raw}')")]
    RestrictedSegment { raw: String, segment: String },

    #[error("module '{0}' does not exist at {1}")]
    SourceMissing(String, PathBuf),

    #[error("module '{0}' is already at the root; give an explicit target path")]
    AlreadyAtRoot(String),

    #[error("cannot move '{source_path}' into its own subtree ('{target}')")]
    IntoOwnSubtree { source_path: String, target: String },

    #[error("source and target are the same module '{0}'")]
    SameLocation(String),

    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),
}

/// Non-fatal problems reported while linking, registering or moving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkWarning {
    /// Neither route file convention matched in the parent's routes directory
    ParentRouteMissing { parent: String, searched: PathBuf },
    /// No placeholder comment and no `children` array could be located
    ChildrenArrayMissing { file: PathBuf },
    /// The requested artifact kind is not in the kind table
    UnknownKind(String),
    FlagRegistryMissing(PathBuf),
    FlagMarkersMissing(PathBuf),
    /// A route file had no export built with the route constructor
    RouteExportMissing(PathBuf),
    /// A best-effort move step failed after the directory was relocated
    MoveStep { step: &'static str, detail: String },
    /// The project config asks for a newer CLI
    CliOutdated(String),
}

impl fmt::Display for LinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkWarning::ParentRouteMissing { parent, searched } => write!(
                f,
                "no route file found for parent module '{}' in {}; link the child manually",
                parent,
                searched.display()
            ),
            LinkWarning::ChildrenArrayMissing { file } => write!(
                f,
                "could not locate a children array in {}; add the merge entry manually",
                file.display()
            ),
            LinkWarning::UnknownKind(kind) => write!(f, "unknown artifact kind '{}', skipped", kind),
            LinkWarning::FlagRegistryMissing(path) => write!(
                f,
                "feature flag registry not found at {}; flag not registered",
                path.display()
            ),
            LinkWarning::FlagMarkersMissing(path) => write!(
                f,
                "feature flag markers not found in {}; flag not registered",
                path.display()
            ),
            LinkWarning::RouteExportMissing(path) => {
                write!(f, "no route export found in {}", path.display())
            }
            LinkWarning::MoveStep { step, detail } => write!(f, "{}: {}", step, detail),
            LinkWarning::CliOutdated(message) => write!(f, "{}", message),
        }
    }
}

/// An unsupported shape found while reconstructing the route tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file.display(),
            self.line,
            self.column,
            self.message
        )
    }
}
