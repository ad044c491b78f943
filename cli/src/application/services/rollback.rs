//! Rolled-back stack handling.
//!
//! A stack whose first create failed ends in `ROLLBACK_COMPLETE`: it holds no
//! resources and cannot be updated, only deleted. Install deletes it (after
//! confirmation) and starts over with a fresh create.

use anyhow::Result;

use super::waiter::wait_for_stack;
use crate::application::ports::{ConfirmPrompt, ProgressLog, StackApi};
use crate::domain::{DeployError, Stack, StackStatus};

const DELETE_PROMPT: &str = "Stack is currently in rolled back state, delete before continuing?";

/// Re-describe `stack` and clear it out of the way if it is rolled back.
///
/// Returns `None` when the stack was deleted, so the caller proceeds as if no
/// stack existed. Any other status passes the fresh snapshot through.
///
/// # Errors
///
/// Returns `DeployError::RolledBackStack` when the operator declines the
/// deletion, or any error from the control plane.
pub async fn resolve_rolled_back_stack(
    api: &impl StackApi,
    prompt: &impl ConfirmPrompt,
    log: &impl ProgressLog,
    stack: &Stack,
    force: bool,
) -> Result<Option<Stack>> {
    let current = api.describe_stack(&stack.stack_id).await?;
    if current.status != StackStatus::RollbackComplete {
        return Ok(Some(current));
    }
    if !(force || prompt.confirm(DELETE_PROMPT)?) {
        return Err(DeployError::RolledBackStack.into());
    }
    tracing::info!(stack = %current.stack_name, forced = force, "deleting rolled back stack");
    api.delete_stack(&current.stack_id).await?;
    wait_for_stack(api, log, &current.stack_id).await?;
    Ok(None)
}

/// Fail if the stack's latest status is any rollback status.
///
/// Rollback completion ends in `_COMPLETE`, so the waiter alone cannot tell
/// it apart from success.
///
/// # Errors
///
/// Returns `DeployError::RolledBack`, or any error from describing the stack.
pub async fn ensure_not_rolled_back(api: &impl StackApi, stack_id: &str) -> Result<Stack> {
    let stack = api.describe_stack(stack_id).await?;
    if stack.status.is_rollback() {
        return Err(DeployError::RolledBack.into());
    }
    Ok(stack)
}
