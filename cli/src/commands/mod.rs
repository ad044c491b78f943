//! Command implementations

pub mod install;
pub mod parameters;
pub mod uninstall;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::StackSettings;
use crate::domain::config::{Overrides, resolve_settings};
use crate::infra::aws::AwsSettings;

/// Target account and region.
#[derive(Args)]
pub struct AwsArgs {
    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub aws_region: String,

    /// AWS access key ID [default: credential chain]
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key [default: credential chain]
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_access_key: Option<String>,
}

impl AwsArgs {
    #[must_use]
    pub fn settings(&self) -> AwsSettings {
        AwsSettings {
            region: self.aws_region.clone(),
            access_key_id: self.aws_access_key_id.clone(),
            secret_access_key: self.aws_secret_access_key.clone(),
        }
    }
}

/// Which stack to act on; overrides the project file.
#[derive(Args)]
pub struct StackArgs {
    /// Stack name
    #[arg(long)]
    pub stack_name: Option<String>,

    /// Name shown in progress headings
    #[arg(long)]
    pub brand_name: Option<String>,
}

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(flatten)]
    pub stack: StackArgs,

    /// Template file
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Template parameter value (repeatable)
    #[arg(short, long = "parameter", value_name = "KEY=VALUE")]
    pub parameters: Vec<String>,

    /// Delete a rolled back stack without asking
    #[arg(long, hide = true)]
    pub force_when_rolled_back: bool,
}

/// Arguments for the uninstall command.
#[derive(Args)]
pub struct UninstallArgs {
    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(flatten)]
    pub stack: StackArgs,
}

/// Arguments for the parameters command.
#[derive(Args)]
pub struct ParametersArgs {
    /// Template file
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,
}

/// Load the project file and apply command-line overrides.
///
/// # Errors
///
/// Returns an error if the file is unreadable or the merged settings are
/// invalid.
pub fn load_settings(
    app: &AppContext,
    stack: &StackArgs,
    template: Option<PathBuf>,
    parameters: Vec<String>,
) -> Result<StackSettings> {
    let file = app.config.load()?;
    let overrides = Overrides {
        stack_name: stack.stack_name.clone(),
        brand_name: stack.brand_name.clone(),
        template,
        parameters,
    };
    resolve_settings(file, overrides, app.config.path())
}
