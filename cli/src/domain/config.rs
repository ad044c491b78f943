//! Domain types and validators for project configuration.
//!
//! Pure functions only. No I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Project file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "aws-install.yaml";

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static STACK_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]{0,127}$").expect("valid regex"));

// ── Config schema ────────────────────────────────────────────────────────────

/// Project configuration stored in `aws-install.yaml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Name of the stack to install.
    pub stack_name: Option<String>,
    /// Display name used in progress headings.
    pub brand_name: Option<String>,
    /// Template path, relative to the config file.
    pub template: Option<PathBuf>,
    /// Template parameter values.
    pub parameters: BTreeMap<String, String>,
}

/// Values given on the command line; each one overrides the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub stack_name: Option<String>,
    pub brand_name: Option<String>,
    pub template: Option<PathBuf>,
    pub parameters: Vec<String>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSettings {
    pub stack_name: String,
    pub brand_name: Option<String>,
    pub template: Option<PathBuf>,
    pub parameters: BTreeMap<String, String>,
}

impl StackSettings {
    /// Heading used for the top-level progress group.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.brand_name.as_deref().unwrap_or(&self.stack_name)
    }

    /// The template path, which `install` and `parameters` require.
    ///
    /// # Errors
    ///
    /// Returns an error if no template was configured.
    pub fn template(&self, config_file: &Path) -> Result<&Path> {
        self.template.as_deref().ok_or_else(|| {
            ConfigError::MissingTemplate {
                file: config_file.display().to_string(),
            }
            .into()
        })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a stack name against the control plane's naming rule.
///
/// # Errors
///
/// Returns an error if the name does not match.
pub fn validate_stack_name(name: &str) -> Result<()> {
    if !STACK_NAME_RE.is_match(name) {
        return Err(ConfigError::InvalidStackName(name.to_string()).into());
    }
    Ok(())
}

/// Parses a `KEY=VALUE` parameter argument.
///
/// # Errors
///
/// Returns an error if there is no `=` or the key is empty.
pub fn parse_parameter(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidParameter(raw.to_string()).into()),
    }
}

/// The template path: the command-line value as given, else the file's
/// value resolved against the config file's directory.
#[must_use]
pub fn resolve_template(
    cli: Option<PathBuf>,
    file: Option<PathBuf>,
    config_file: &Path,
) -> Option<PathBuf> {
    let config_dir = config_file.parent().unwrap_or_else(|| Path::new(""));
    cli.or_else(|| file.map(|t| config_dir.join(t)))
}

/// Merge command-line overrides over the project file.
///
/// A template path taken from the file is resolved against `config_file`'s
/// directory.
///
/// # Errors
///
/// Returns an error if no stack name is available, the stack name is invalid,
/// or a parameter argument is malformed.
pub fn resolve_settings(
    file: ProjectConfig,
    overrides: Overrides,
    config_file: &Path,
) -> Result<StackSettings> {
    let stack_name = overrides
        .stack_name
        .or(file.stack_name)
        .ok_or_else(|| ConfigError::MissingStackName {
            file: config_file.display().to_string(),
        })?;
    validate_stack_name(&stack_name)?;

    let template = resolve_template(overrides.template, file.template, config_file);

    let mut parameters = file.parameters;
    for raw in &overrides.parameters {
        let (key, value) = parse_parameter(raw)?;
        parameters.insert(key, value);
    }

    Ok(StackSettings {
        stack_name,
        brand_name: overrides.brand_name.or(file.brand_name),
        template,
        parameters,
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
