//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod stack;
pub mod status;
pub mod template;

pub use config::{ProjectConfig, StackSettings, resolve_settings, validate_stack_name};
pub use error::{ConfigError, DeployError, TemplateError};
pub use stack::{
    ChangeSet, ChangeSetKind, ChangeSetRef, ChangeSetRequest, ChangeSetStatus, Stack,
    StackEvent, StackOutput, StackStatus, StackSummary, Tag,
};
pub use status::StatusReporter;
pub use template::{ParameterSpec, Template};
