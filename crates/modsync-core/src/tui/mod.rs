//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use prompts::{
    finish_cancelled, run_generate, run_move, run_visualize, GenerateArgs, MoveArgs, TuiReporter,
};
