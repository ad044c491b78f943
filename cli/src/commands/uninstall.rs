//! `aws-install uninstall`: delete the stack and its asset bucket.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::uninstall::uninstall;
use crate::commands::{UninstallArgs, load_settings};
use crate::infra::aws::AwsClients;
use crate::infra::cloudformation::CloudFormationApi;
use crate::infra::s3::S3AssetStore;
use crate::output::TerminalLog;

/// Run `aws-install uninstall`.
///
/// Succeeds without changes when no active stack exists.
///
/// # Errors
///
/// Returns an error if settings are incomplete or a deletion fails.
pub async fn run(app: &AppContext, args: UninstallArgs) -> Result<()> {
    let settings = load_settings(app, &args.stack, None, Vec::new())?;

    let clients = AwsClients::connect(&args.aws.settings()).await;
    let api = CloudFormationApi::new(clients.cloudformation);
    let store = S3AssetStore::new(clients.s3);
    let log = TerminalLog::new(&app.output);

    uninstall(
        &api,
        &store,
        &log,
        &settings.stack_name,
        settings.display_name(),
    )
    .await?;
    Ok(())
}
