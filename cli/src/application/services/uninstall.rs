//! Application service: uninstall use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use super::bucket::delete_asset_bucket;
use super::events::{EventTailer, while_tailing};
use super::stacks::get_active_stack;
use super::waiter::wait_for_stack;
use crate::application::ports::{AssetStore, ProgressLog, StackApi};

/// Outcome of the `uninstall` use-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// No active stack has the requested name.
    NothingToUninstall,
    Uninstalled,
}

/// Delete the stack's asset bucket, then the stack itself.
///
/// # Errors
///
/// Returns an error if any remote call fails.
pub async fn uninstall(
    api: &impl StackApi,
    store: &impl AssetStore,
    log: &impl ProgressLog,
    stack_name: &str,
    display_name: &str,
) -> Result<UninstallOutcome> {
    log.group(&format!("Uninstall {display_name}"));
    log.info("Remove system stack");

    let Some(stack) = get_active_stack(api, stack_name).await? else {
        log.info("Nothing to uninstall");
        log.group_end();
        return Ok(UninstallOutcome::NothingToUninstall);
    };

    log.info("Delete assets");
    delete_asset_bucket(store, &stack).await?;

    let tailer = EventTailer::start(api, log, &stack.stack_id, stack_name).await?;
    api.delete_stack(&stack.stack_name).await?;
    log.group("Wait for uninstall");
    while_tailing(tailer, wait_for_stack(api, log, &stack.stack_id)).await?;
    log.group_end();

    tracing::info!(stack = stack_name, "uninstall finished");
    log.info("Uninstall complete");
    log.group_end();
    Ok(UninstallOutcome::Uninstalled)
}
