//! `aws-install install`: create or update the stack.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::install::{InstallOptions, InstallOutcome, install};
use crate::commands::{InstallArgs, load_settings};
use crate::infra::aws::AwsClients;
use crate::infra::cloudformation::CloudFormationApi;
use crate::infra::fs::LocalFs;
use crate::infra::s3::S3AssetStore;
use crate::output::TerminalLog;

/// Run `aws-install install`.
///
/// # Errors
///
/// Returns an error if settings are incomplete or the install fails.
pub async fn run(app: &AppContext, args: InstallArgs) -> Result<()> {
    let settings = load_settings(app, &args.stack, args.template, args.parameters)?;
    let template = settings.template(app.config.path())?;

    let clients = AwsClients::connect(&args.aws.settings()).await;
    let api = CloudFormationApi::new(clients.cloudformation);
    let store = S3AssetStore::new(clients.s3);
    let log = TerminalLog::new(&app.output);

    let outcome = install(
        &api,
        &store,
        &LocalFs,
        app,
        InstallOptions {
            log: &log,
            stack_name: &settings.stack_name,
            display_name: settings.display_name(),
            template_path: template,
            region: &args.aws.aws_region,
            parameters: &settings.parameters,
            force: args.force_when_rolled_back,
        },
    )
    .await?;

    if let InstallOutcome::Installed(stack) = outcome {
        app.output.stack_outputs(&stack.outputs);
    }
    Ok(())
}
