//! Wait for a stack to reach a terminal status.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use super::POLL_INTERVAL;
use crate::application::ports::{ProgressLog, StackApi};
use crate::domain::{StackStatus, StatusReporter};

/// Poll the stack every [`POLL_INTERVAL`] until its status ends in
/// `_COMPLETE`, reporting each distinct status on the way.
///
/// Rollback completion is terminal too; callers that care must inspect the
/// returned status. There is no deadline.
///
/// # Errors
///
/// Returns the first error from describing the stack; polls are not retried.
pub async fn wait_for_stack(
    api: &impl StackApi,
    log: &impl ProgressLog,
    stack_id: &str,
) -> Result<StackStatus> {
    let mut reporter = StatusReporter::new();
    loop {
        let stack = api.describe_stack(stack_id).await?;
        if let Some(line) = reporter.observe(stack.status.as_str()) {
            log.info(&line);
        }
        if stack.status.is_terminal() {
            return Ok(stack.status);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
