//! Application context: unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, the project config location, and
//! interaction policy so command handlers take one argument instead of many.

use anyhow::Result;

use crate::application::ports::ConfirmPrompt;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Project file given with `--config` or `AWS_INSTALL_CONFIG`.
    pub config: Option<std::path::PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Where the project file lives.
    pub config: YamlConfigStore,
    /// When `true`, prompts are declined without asking.
    ///
    /// Set when the `CI` environment variable is present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            config: YamlConfigStore::locate(flags.config),
            non_interactive: std::env::var("CI").is_ok(),
        }
    }
}

impl ConfirmPrompt for AppContext {
    /// Ask on the terminal. In non-interactive runs the answer is no, so a
    /// destructive step only happens when forced explicitly.
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.non_interactive {
            tracing::debug!(prompt, "declining prompt in non-interactive mode");
            return Ok(false);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
