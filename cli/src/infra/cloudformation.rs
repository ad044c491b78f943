//! CloudFormation implementation of the `StackApi` port.

use anyhow::{Context, Result};
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudformation::types::{self as cfn, Capability, ChangeSetType, Parameter};
use chrono::{DateTime, Utc};

use crate::application::ports::StackApi;
use crate::domain::stack::{ChangeAction, ResourceChange};
use crate::domain::{
    ChangeSet, ChangeSetRef, ChangeSetRequest, ChangeSetStatus, DeployError, Stack, StackEvent,
    StackOutput, StackStatus, StackSummary, Tag,
};

/// Error code the control plane uses for rejected templates.
const VALIDATION_ERROR_CODE: &str = "ValidationError";

/// `StackApi` backed by the CloudFormation SDK client.
pub struct CloudFormationApi {
    client: Client,
}

impl CloudFormationApi {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn api_error(action: &str, err: impl std::error::Error) -> anyhow::Error {
    anyhow::anyhow!("{action}: {}", DisplayErrorContext(err))
}

fn to_chrono(time: &aws_sdk_cloudformation::primitives::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos()).unwrap_or_default()
}

fn to_stack(stack: &cfn::Stack) -> Stack {
    Stack {
        stack_id: stack.stack_id().unwrap_or_default().to_string(),
        stack_name: stack.stack_name().unwrap_or_default().to_string(),
        status: StackStatus::parse(stack.stack_status().map_or("", cfn::StackStatus::as_str)),
        tags: stack
            .tags()
            .iter()
            .map(|t| Tag {
                key: t.key().unwrap_or_default().to_string(),
                value: t.value().unwrap_or_default().to_string(),
            })
            .collect(),
        outputs: stack
            .outputs()
            .iter()
            .map(|o| StackOutput {
                key: o.output_key().unwrap_or_default().to_string(),
                value: o.output_value().unwrap_or_default().to_string(),
                description: o.description().map(str::to_string),
            })
            .collect(),
    }
}

fn to_event(event: &cfn::StackEvent) -> StackEvent {
    StackEvent {
        timestamp: event.timestamp().map(to_chrono).unwrap_or_default(),
        stack_name: event.stack_name().unwrap_or_default().to_string(),
        logical_resource_id: event.logical_resource_id().unwrap_or_default().to_string(),
        resource_type: event.resource_type().unwrap_or_default().to_string(),
        status: event
            .resource_status()
            .map_or("", cfn::ResourceStatus::as_str)
            .to_string(),
        status_reason: event.resource_status_reason().map(str::to_string),
    }
}

fn to_change(change: &cfn::Change) -> Option<ResourceChange> {
    let resource = change.resource_change()?;
    Some(ResourceChange {
        action: ChangeAction::parse(resource.action().map_or("", cfn::ChangeAction::as_str)),
        logical_resource_id: resource.logical_resource_id().unwrap_or_default().to_string(),
        resource_type: resource.resource_type().unwrap_or_default().to_string(),
    })
}

impl StackApi for CloudFormationApi {
    async fn list_stacks(&self, statuses: &[StackStatus]) -> Result<Vec<StackSummary>> {
        let filter: Vec<cfn::StackStatus> = statuses
            .iter()
            .map(|s| cfn::StackStatus::from(s.as_str()))
            .collect();
        let mut summaries = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self
                .client
                .list_stacks()
                .set_stack_status_filter(Some(filter.clone()))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| api_error("failed to list stacks", e))?;
            summaries.extend(page.stack_summaries().iter().map(|s| StackSummary {
                stack_id: s.stack_id().unwrap_or_default().to_string(),
                stack_name: s.stack_name().unwrap_or_default().to_string(),
                status: StackStatus::parse(s.stack_status().map_or("", cfn::StackStatus::as_str)),
            }));
            next_token = page.next_token().map(str::to_string);
            if next_token.is_none() {
                return Ok(summaries);
            }
        }
    }

    async fn describe_stack(&self, stack: &str) -> Result<Stack> {
        let out = self
            .client
            .describe_stacks()
            .stack_name(stack)
            .send()
            .await
            .map_err(|e| api_error(&format!("failed to describe stack {stack}"), e))?;
        out.stacks()
            .first()
            .map(to_stack)
            .ok_or_else(|| DeployError::StackNotFound(stack.to_string()).into())
    }

    async fn describe_stack_events(&self, stack: &str) -> Result<Vec<StackEvent>> {
        // The first page holds the newest events, which is all the tailer needs.
        let out = self
            .client
            .describe_stack_events()
            .stack_name(stack)
            .send()
            .await
            .map_err(|e| api_error(&format!("failed to read events of {stack}"), e))?;
        Ok(out.stack_events().iter().map(to_event).collect())
    }

    async fn delete_stack(&self, stack: &str) -> Result<()> {
        self.client
            .delete_stack()
            .stack_name(stack)
            .send()
            .await
            .map_err(|e| api_error(&format!("failed to delete stack {stack}"), e))?;
        Ok(())
    }

    async fn validate_template(&self, body: &str) -> Result<()> {
        match self.client.validate_template().template_body(body).send().await {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some(VALIDATION_ERROR_CODE) => Err(DeployError::Validation(
                e.message().unwrap_or("template rejected").to_string(),
            )
            .into()),
            Err(e) => Err(api_error("failed to validate template", e)),
        }
    }

    async fn create_change_set(&self, request: &ChangeSetRequest<'_>) -> Result<ChangeSetRef> {
        let parameters = request
            .parameters
            .iter()
            .map(|(key, value)| {
                Parameter::builder()
                    .parameter_key(key)
                    .parameter_value(value)
                    .build()
            })
            .collect();
        let tags = request
            .tags
            .iter()
            .map(|t| cfn::Tag::builder().key(&t.key).value(&t.value).build())
            .collect();
        let out = self
            .client
            .create_change_set()
            .stack_name(request.stack_name)
            .change_set_name(&request.change_set_name)
            .change_set_type(ChangeSetType::from(request.kind.as_str()))
            .template_body(request.template_body)
            .capabilities(Capability::CapabilityNamedIam)
            .set_parameters(Some(parameters))
            .set_tags(Some(tags))
            .send()
            .await
            .map_err(|e| api_error("failed to create change set", e))?;
        Ok(ChangeSetRef {
            change_set_id: out.id().context("change set created without an id")?.to_string(),
            stack_id: out.stack_id().unwrap_or_default().to_string(),
        })
    }

    async fn describe_change_set(&self, change_set_id: &str) -> Result<ChangeSet> {
        let mut changes = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self
                .client
                .describe_change_set()
                .change_set_name(change_set_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| api_error("failed to describe change set", e))?;
            changes.extend(page.changes().iter().filter_map(to_change));
            next_token = page.next_token().map(str::to_string);
            if next_token.is_none() {
                return Ok(ChangeSet {
                    change_set_id: page.change_set_id().unwrap_or(change_set_id).to_string(),
                    stack_id: page.stack_id().unwrap_or_default().to_string(),
                    status: ChangeSetStatus::parse(
                        page.status().map_or("", cfn::ChangeSetStatus::as_str),
                    ),
                    status_reason: page.status_reason().map(str::to_string),
                    changes,
                });
            }
        }
    }

    async fn delete_change_set(&self, change_set_id: &str) -> Result<()> {
        self.client
            .delete_change_set()
            .change_set_name(change_set_id)
            .send()
            .await
            .map_err(|e| api_error("failed to delete change set", e))?;
        Ok(())
    }

    async fn execute_change_set(&self, change_set_id: &str) -> Result<()> {
        self.client
            .execute_change_set()
            .change_set_name(change_set_id)
            .send()
            .await
            .map_err(|e| api_error("failed to execute change set", e))?;
        Ok(())
    }
}
