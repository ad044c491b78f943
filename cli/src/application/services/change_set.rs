//! Change-set creation, classification, and display.

use anyhow::Result;
use chrono::Utc;

use super::POLL_INTERVAL;
use crate::application::ports::{ProgressLog, StackApi};
use crate::domain::stack::{BUCKET_NAME_TAG, ChangeAction, change_set_name};
use crate::domain::{
    ChangeSet, ChangeSetKind, ChangeSetRequest, ChangeSetStatus, DeployError, StatusReporter, Tag,
};

/// What to submit as a change set.
#[derive(Debug, Clone, Copy)]
pub struct ChangeSetPlan<'a> {
    pub stack_name: &'a str,
    pub kind: ChangeSetKind,
    pub template_body: &'a str,
    pub bucket: &'a str,
    pub parameters: &'a [(String, String)],
}

/// Create a change set and wait until it is ready to execute.
///
/// Returns `None` when the control plane found nothing to change; the empty
/// change set has been deleted by then.
///
/// # Errors
///
/// Returns `DeployError::ChangeSetFailed` when a change set with proposed
/// changes fails, or any error from the control plane.
pub async fn create_and_wait(
    api: &impl StackApi,
    log: &impl ProgressLog,
    plan: &ChangeSetPlan<'_>,
) -> Result<Option<ChangeSet>> {
    let request = ChangeSetRequest {
        stack_name: plan.stack_name,
        change_set_name: change_set_name(plan.stack_name, Utc::now()),
        kind: plan.kind,
        template_body: plan.template_body,
        parameters: plan.parameters,
        tags: vec![Tag {
            key: BUCKET_NAME_TAG.to_string(),
            value: plan.bucket.to_string(),
        }],
    };
    let created = api.create_change_set(&request).await?;
    tracing::debug!(change_set = %created.change_set_id, kind = plan.kind.as_str(), "created change set");

    let mut reporter = StatusReporter::new();
    loop {
        let change_set = api.describe_change_set(&created.change_set_id).await?;
        if change_set.status == ChangeSetStatus::Failed {
            let reason = change_set.status_reason.unwrap_or_default();
            if !change_set.changes.is_empty() {
                return Err(DeployError::ChangeSetFailed { reason }.into());
            }
            tracing::debug!(%reason, "change set has no changes");
            api.delete_change_set(&created.change_set_id).await?;
            return Ok(None);
        }
        if let Some(line) = reporter.observe(change_set.status.as_str()) {
            log.info(&line);
        }
        if change_set.status.is_terminal() {
            return Ok(Some(change_set));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// List proposed changes grouped by action: additions, then modifications,
/// then removals.
pub fn show_changes(log: &impl ProgressLog, change_set: &ChangeSet) {
    for action in &ChangeAction::DISPLAYED {
        let mut matching = change_set
            .changes
            .iter()
            .filter(|c| &c.action == action)
            .peekable();
        if matching.peek().is_none() {
            continue;
        }
        log.group(&format!("{} resources", action.as_str()));
        for change in matching {
            log.info(&format!(
                "{} ({})",
                change.logical_resource_id, change.resource_type
            ));
        }
        log.group_end();
    }
}
