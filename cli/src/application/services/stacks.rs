//! Active stack lookup.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::StackApi;
use crate::domain::Stack;
use crate::domain::stack::ACTIVE_STATUSES;

/// Find the active stack named `stack_name` and describe it.
///
/// Returns `None` when no active stack has that name, or when the stack
/// disappears between the list and the describe call.
///
/// # Errors
///
/// Returns an error if listing stacks fails.
pub async fn get_active_stack(api: &impl StackApi, stack_name: &str) -> Result<Option<Stack>> {
    let summaries = api.list_stacks(ACTIVE_STATUSES).await?;
    let Some(summary) = summaries
        .into_iter()
        .rev()
        .find(|s| s.stack_name == stack_name)
    else {
        return Ok(None);
    };
    match api.describe_stack(&summary.stack_id).await {
        Ok(stack) => Ok(Some(stack)),
        Err(e) => {
            tracing::debug!(stack = stack_name, error = %e, "active stack vanished before describe");
            Ok(None)
        }
    }
}
