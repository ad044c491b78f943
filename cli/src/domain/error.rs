//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Deployment errors ─────────────────────────────────────────────────────────

/// Failures of the install/uninstall pipeline that are not plain remote-call
/// errors.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Template validation failed: {0}")]
    Validation(String),

    #[error("Cannot install with stack in rolled back state")]
    RolledBackStack,

    #[error("Change set failed: {reason}")]
    ChangeSetFailed { reason: String },

    #[error("An error occurred and your stack was rolled back")]
    RolledBack,

    #[error("Stack '{0}' not found")]
    StackNotFound(String),
}

// ── Template errors ───────────────────────────────────────────────────────────

/// Errors raised while reading a template or resolving its parameters.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template is not valid YAML: {0}")]
    Parse(String),

    #[error("Template has no Resources section")]
    NoResources,

    #[error("Cannot render packaged template: {0}")]
    Render(String),

    #[error("Missing value for required template parameter '{0}'")]
    MissingParameter(String),

    #[error("Unknown template parameter '{key}'\n\nValid parameters: {valid}")]
    UnknownParameter { key: String, valid: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to project configuration and command-line values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No stack name given. Pass --stack-name or set stack_name in {file}")]
    MissingStackName { file: String },

    #[error("No template given. Pass --template or set template in {file}")]
    MissingTemplate { file: String },

    #[error(
        "Invalid stack name '{0}': must match ^[A-Za-z][A-Za-z0-9-]{{0,127}}$"
    )]
    InvalidStackName(String),

    #[error("Invalid parameter '{0}': expected KEY=VALUE")]
    InvalidParameter(String),
}
