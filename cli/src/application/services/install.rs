//! Application service: install use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use super::change_set::{ChangeSetPlan, create_and_wait, show_changes};
use super::events::{EventTailer, while_tailing};
use super::packager::{PackageRequest, package_template};
use super::rollback::{ensure_not_rolled_back, resolve_rolled_back_stack};
use super::stacks::get_active_stack;
use super::waiter::wait_for_stack;
use crate::application::ports::{AssetStore, ConfirmPrompt, LocalFiles, ProgressLog, StackApi};
use crate::domain::stack::bucket_name_for_stack;
use crate::domain::template::resolve_parameters;
use crate::domain::{ChangeSetKind, Stack, Template};

/// Options of one install run.
pub struct InstallOptions<'a, L: ProgressLog> {
    pub log: &'a L,
    pub stack_name: &'a str,
    /// Name shown in the top-level heading.
    pub display_name: &'a str,
    pub template_path: &'a Path,
    pub region: &'a str,
    pub parameters: &'a BTreeMap<String, String>,
    /// Delete a rolled back stack without asking.
    pub force: bool,
}

/// Outcome of the `install` use-case.
#[derive(Debug)]
pub enum InstallOutcome {
    /// The deployed stack already matches the template.
    NoChanges,
    /// The change set was executed; carries the converged stack.
    Installed(Stack),
}

/// Create or update the stack from a template.
///
/// # Errors
///
/// Returns an error if the template is invalid, a rolled back stack is kept,
/// the change set fails, the stack rolls back, or any remote call fails.
pub async fn install(
    api: &impl StackApi,
    store: &impl AssetStore,
    files: &impl LocalFiles,
    prompt: &impl ConfirmPrompt,
    opts: InstallOptions<'_, impl ProgressLog>,
) -> Result<InstallOutcome> {
    let log = opts.log;
    log.group(&format!("Install {}", opts.display_name));

    let raw_template = files.read_template(opts.template_path)?;
    let schema = Template::parse(&raw_template)?.parameters();
    let parameters = resolve_parameters(&schema, opts.parameters)?;
    api.validate_template(&raw_template).await?;

    let mut stack = current_stack(api, prompt, log, opts.stack_name, opts.force).await?;
    if let Some(existing) = stack.as_ref().filter(|s| s.is_deployed()) {
        log.group("Wait for running tasks");
        wait_for_stack(api, log, &existing.stack_id).await?;
        log.group_end();
        // The running operation may itself have rolled the stack back.
        stack = current_stack(api, prompt, log, opts.stack_name, opts.force).await?;
    }

    let kind = ChangeSetKind::for_stack(stack.as_ref());
    log.info(match kind {
        ChangeSetKind::Update => "Update change set",
        ChangeSetKind::Create => "Create change set",
    });

    log.info("Process template assets");
    let bucket = bucket_name_for_stack(opts.stack_name, stack.as_ref());
    let template_body = package_template(
        store,
        files,
        &PackageRequest {
            stack_name: opts.stack_name,
            bucket: &bucket,
            template_path: opts.template_path,
            region: opts.region,
        },
    )
    .await?;

    log.group("Wait for change set");
    let plan = ChangeSetPlan {
        stack_name: opts.stack_name,
        kind,
        template_body: &template_body,
        bucket: &bucket,
        parameters: &parameters,
    };
    let Some(change_set) = create_and_wait(api, log, &plan).await? else {
        log.info("No changes found");
        log.group_end();
        log.group_end();
        return Ok(InstallOutcome::NoChanges);
    };
    log.group_end();

    log.group("Execute change set");
    show_changes(log, &change_set);
    log.group_end();

    let stack_id = change_set.stack_id.as_str();
    let tailer = EventTailer::start(api, log, stack_id, opts.stack_name).await?;
    while_tailing(tailer, async {
        api.execute_change_set(&change_set.change_set_id).await?;
        log.group("Wait for stack ready");
        let status = wait_for_stack(api, log, stack_id).await;
        log.group_end();
        status
    })
    .await?;

    let installed = ensure_not_rolled_back(api, stack_id).await?;
    tracing::info!(stack = %installed.stack_name, status = %installed.status, "install finished");
    log.info("Install complete");
    log.group_end();
    Ok(InstallOutcome::Installed(installed))
}

/// Look up the active stack, clearing it away first if it is rolled back.
async fn current_stack(
    api: &impl StackApi,
    prompt: &impl ConfirmPrompt,
    log: &impl ProgressLog,
    stack_name: &str,
    force: bool,
) -> Result<Option<Stack>> {
    match get_active_stack(api, stack_name).await? {
        Some(existing) => resolve_rolled_back_stack(api, prompt, log, &existing, force).await,
        None => Ok(None),
    }
}
