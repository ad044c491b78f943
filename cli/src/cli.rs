//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Install and uninstall a CloudFormation stack through change sets
#[derive(Parser)]
#[command(
    name = "aws-install",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Show debug logs and full error chains
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Project file [default: ./aws-install.yaml]
    #[arg(long, global = true, env = "AWS_INSTALL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or update the stack from its template
    Install(commands::InstallArgs),

    /// Delete the stack and its asset bucket
    Uninstall(commands::UninstallArgs),

    /// List the template's parameters
    Parameters(commands::ParametersArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            config,
            command,
            ..
        } = self;
        let app = AppContext::new(AppFlags {
            no_color,
            quiet,
            config,
        });
        match command {
            Command::Install(args) => commands::install::run(&app, args).await,
            Command::Uninstall(args) => commands::uninstall::run(&app, args).await,
            Command::Parameters(args) => commands::parameters::run(&app, &args),
        }
    }
}
