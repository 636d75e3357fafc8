//! Warning sinks
//!
//! Link warnings are reported the moment they happen rather than collected and
//! returned, so a later fatal error still leaves the earlier warnings on screen.

use crate::error::LinkWarning;
use colored::Colorize;
use std::cell::RefCell;

/// Receives non-fatal warnings as they occur
pub trait Reporter {
    fn warn(&self, warning: LinkWarning);

    /// Informational progress line (files created, links added)
    fn info(&self, _message: &str) {}
}

/// Plain stderr reporter for unattended runs, where prompt widgets would only
/// add escape codes to a log
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl StderrReporter {
    fn warning_line(warning: &LinkWarning) -> String {
        format!("{} {}", "Warning:".yellow(), warning)
    }

    fn info_line(message: &str) -> String {
        format!("  {} {}", "->".blue(), message)
    }
}

impl Reporter for StderrReporter {
    fn warn(&self, warning: LinkWarning) {
        tracing::debug!(?warning, "link warning");
        eprintln!("{}", Self::warning_line(&warning));
    }

    fn info(&self, message: &str) {
        eprintln!("{}", Self::info_line(message));
    }
}

/// Keeps every warning in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    warnings: RefCell<Vec<LinkWarning>>,
    infos: RefCell<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<LinkWarning> {
        self.warnings.borrow().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }
}

impl Reporter for CollectingReporter {
    fn warn(&self, warning: LinkWarning) {
        self.warnings.borrow_mut().push(warning);
    }

    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_stderr_lines_carry_the_message() {
        let line = StderrReporter::warning_line(&LinkWarning::UnknownKind("widget".to_string()));
        assert!(line.contains("Warning:"));
        assert!(line.contains("widget"));

        let line = StderrReporter::info_line("Created route stub a.routes.tsx");
        assert!(line.ends_with("Created route stub a.routes.tsx"));
    }

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        let sink: &dyn Reporter = &reporter;
        sink.warn(LinkWarning::FlagRegistryMissing(PathBuf::from("a.ts")));
        sink.info("one");
        sink.warn(LinkWarning::UnknownKind("b".to_string()));
        sink.info("two");

        assert_eq!(
            reporter.warnings(),
            vec![
                LinkWarning::FlagRegistryMissing(PathBuf::from("a.ts")),
                LinkWarning::UnknownKind("b".to_string()),
            ]
        );
        assert_eq!(reporter.infos(), vec!["one", "two"]);
    }
}
