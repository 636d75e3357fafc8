//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to brand the prompts and to say where its
//! project configuration lives.

/// Configuration trait for the CLI product
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the command name)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Project configuration file, relative to the project root
    fn config_file_name(&self) -> &'static str {
        "modsync.yaml"
    }
}
