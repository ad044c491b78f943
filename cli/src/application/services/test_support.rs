//! Shared test doubles for the orchestration services.
//!
//! `FakeCloud` implements every port against in-memory state and records the
//! calls it receives, so tests can assert both outcomes and side effects.
//! Stack statuses are scripted: each `describe_stack` pops the next scripted
//! status and makes it the stack's current one.

#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::application::ports::{
    AssetStore, BucketCreation, ConfirmPrompt, LocalFiles, ProgressLog, StackApi,
};
use crate::domain::stack::{BUCKET_NAME_TAG, ChangeAction, ResourceChange};
use crate::domain::{
    ChangeSet, ChangeSetKind, ChangeSetRef, ChangeSetRequest, ChangeSetStatus, DeployError,
    Stack, StackEvent, StackStatus, StackSummary, Tag,
};

pub const STACK_NAME: &str = "demo";
pub const STACK_ID: &str = "arn:aws:cloudformation:eu-west-1:1:stack/demo/1";
pub const CHANGE_SET_ID: &str = "arn:aws:cloudformation:eu-west-1:1:changeSet/demo1/1";

pub const TEMPLATE: &str = r"
Parameters:
  StageName:
    Description: API stage
Resources:
  Handler:
    Type: AWS::Lambda::Function
    Properties:
      Code: src/handler
  Worker:
    Type: AWS::Lambda::Function
    Properties:
      Code: src/worker
";

/// Build a stack snapshot with the fake's fixed identity.
pub fn stack(status: StackStatus, bucket: Option<&str>) -> Stack {
    Stack {
        stack_id: STACK_ID.to_string(),
        stack_name: STACK_NAME.to_string(),
        status,
        tags: bucket
            .map(|b| {
                vec![Tag {
                    key: BUCKET_NAME_TAG.to_string(),
                    value: b.to_string(),
                }]
            })
            .unwrap_or_default(),
        outputs: Vec::new(),
    }
}

/// A proposed change for `logical` with the given action.
pub fn change(action: ChangeAction, logical: &str) -> ResourceChange {
    ResourceChange {
        action,
        logical_resource_id: logical.to_string(),
        resource_type: "AWS::Lambda::Function".to_string(),
    }
}

/// An event for `logical` at `secs` seconds after the epoch.
pub fn event(secs: i64, logical: &str, status: &str) -> StackEvent {
    StackEvent {
        timestamp: DateTime::<Utc>::from_timestamp(secs, 0).expect("timestamp"),
        stack_name: STACK_NAME.to_string(),
        logical_resource_id: logical.to_string(),
        resource_type: "AWS::Lambda::Function".to_string(),
        status: status.to_string(),
        status_reason: None,
    }
}

/// Arguments of one `create_change_set` call.
#[derive(Debug, Clone)]
pub struct CreatedChangeSet {
    pub kind: ChangeSetKind,
    pub name: String,
    pub template_body: String,
    pub parameters: Vec<(String, String)>,
    pub tags: Vec<Tag>,
}

#[derive(Default)]
pub struct FakeCloud {
    stack: Mutex<Option<Stack>>,
    stack_script: Mutex<VecDeque<StackStatus>>,
    events: Mutex<Vec<StackEvent>>,
    event_batches: Mutex<VecDeque<Vec<StackEvent>>>,
    changes: Mutex<Vec<ResourceChange>>,
    change_set_script: Mutex<VecDeque<ChangeSetStatus>>,
    change_set_reason: Mutex<Option<String>>,
    created: Mutex<Vec<CreatedChangeSet>>,
    validation_error: Mutex<Option<String>>,
    buckets: Mutex<BTreeSet<String>>,
    bucket_tags: Mutex<BTreeMap<String, Vec<Tag>>>,
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    conflict_on_create: Mutex<bool>,
    confirm_answer: Mutex<bool>,
    template: Mutex<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        let fake = Self::default();
        *fake.template.lock().expect("lock") = TEMPLATE.to_string();
        fake
    }

    pub fn with_stack(self, stack: Stack) -> Self {
        *self.stack.lock().expect("lock") = Some(stack);
        self
    }

    pub fn with_stack_script(self, statuses: impl IntoIterator<Item = StackStatus>) -> Self {
        self.stack_script.lock().expect("lock").extend(statuses);
        self
    }

    pub fn with_events(self, events: Vec<StackEvent>) -> Self {
        *self.events.lock().expect("lock") = events;
        self
    }

    /// Each `describe_stack_events` call after the first prepends one batch.
    pub fn with_event_batches(self, batches: Vec<Vec<StackEvent>>) -> Self {
        self.event_batches.lock().expect("lock").extend(batches);
        self
    }

    pub fn with_changes(self, changes: Vec<ResourceChange>) -> Self {
        *self.changes.lock().expect("lock") = changes;
        self
    }

    pub fn with_change_set_script(
        self,
        statuses: impl IntoIterator<Item = ChangeSetStatus>,
    ) -> Self {
        self.change_set_script.lock().expect("lock").extend(statuses);
        self
    }

    pub fn with_change_set_reason(self, reason: &str) -> Self {
        *self.change_set_reason.lock().expect("lock") = Some(reason.to_string());
        self
    }

    pub fn with_validation_error(self, message: &str) -> Self {
        *self.validation_error.lock().expect("lock") = Some(message.to_string());
        self
    }

    pub fn with_bucket(self, bucket: &str) -> Self {
        self.buckets.lock().expect("lock").insert(bucket.to_string());
        self
    }

    pub fn with_object(self, bucket: &str, key: &str) -> Self {
        self.objects
            .lock()
            .expect("lock")
            .insert((bucket.to_string(), key.to_string()), b"data".to_vec());
        self
    }

    pub fn with_create_conflict(self) -> Self {
        *self.conflict_on_create.lock().expect("lock") = true;
        self
    }

    pub fn confirming(self, answer: bool) -> Self {
        *self.confirm_answer.lock().expect("lock") = answer;
        self
    }

    pub fn with_template(self, template: &str) -> Self {
        *self.template.lock().expect("lock") = template.to_string();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn created_change_sets(&self) -> Vec<CreatedChangeSet> {
        self.created.lock().expect("lock").clone()
    }

    pub fn current_stack(&self) -> Option<Stack> {
        self.stack.lock().expect("lock").clone()
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.lock().expect("lock").iter().cloned().collect()
    }

    pub fn bucket_tags(&self, bucket: &str) -> Vec<Tag> {
        self.bucket_tags
            .lock()
            .expect("lock")
            .get(bucket)
            .cloned()
            .unwrap_or_default()
    }

    pub fn object_keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("lock")
            .keys()
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("lock")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().expect("lock").push(call.into());
    }
}

impl StackApi for FakeCloud {
    async fn list_stacks(&self, statuses: &[StackStatus]) -> Result<Vec<StackSummary>> {
        self.record("list_stacks");
        Ok(self
            .stack
            .lock()
            .expect("lock")
            .iter()
            .filter(|s| statuses.contains(&s.status))
            .map(|s| StackSummary {
                stack_id: s.stack_id.clone(),
                stack_name: s.stack_name.clone(),
                status: s.status.clone(),
            })
            .collect())
    }

    async fn describe_stack(&self, id: &str) -> Result<Stack> {
        self.record("describe_stack");
        let mut guard = self.stack.lock().expect("lock");
        let Some(stack) = guard
            .as_mut()
            .filter(|s| s.stack_id == id || s.stack_name == id)
        else {
            anyhow::bail!("Stack with id {id} does not exist");
        };
        if let Some(next) = self.stack_script.lock().expect("lock").pop_front() {
            stack.status = next;
        }
        Ok(stack.clone())
    }

    async fn describe_stack_events(&self, _: &str) -> Result<Vec<StackEvent>> {
        let first = self.count("describe_stack_events") == 0;
        self.record("describe_stack_events");
        let mut events = self.events.lock().expect("lock");
        if !first {
            if let Some(mut batch) = self.event_batches.lock().expect("lock").pop_front() {
                batch.append(&mut events);
                *events = batch;
            }
        }
        Ok(events.clone())
    }

    async fn delete_stack(&self, id: &str) -> Result<()> {
        self.record(format!("delete_stack:{id}"));
        if let Some(stack) = self.stack.lock().expect("lock").as_mut() {
            stack.status = StackStatus::DeleteInProgress;
        }
        let mut script = self.stack_script.lock().expect("lock");
        if script.is_empty() {
            script.push_back(StackStatus::DeleteComplete);
        }
        Ok(())
    }

    async fn validate_template(&self, _: &str) -> Result<()> {
        self.record("validate_template");
        match self.validation_error.lock().expect("lock").clone() {
            Some(message) => Err(DeployError::Validation(message).into()),
            None => Ok(()),
        }
    }

    async fn create_change_set(&self, request: &ChangeSetRequest<'_>) -> Result<ChangeSetRef> {
        self.record(format!("create_change_set:{}", request.kind.as_str()));
        self.created.lock().expect("lock").push(CreatedChangeSet {
            kind: request.kind,
            name: request.change_set_name.clone(),
            template_body: request.template_body.to_string(),
            parameters: request.parameters.to_vec(),
            tags: request.tags.clone(),
        });
        let mut guard = self.stack.lock().expect("lock");
        if guard.as_ref().is_none_or(|s| !s.status.is_active()) {
            *guard = Some(Stack {
                stack_id: STACK_ID.to_string(),
                stack_name: request.stack_name.to_string(),
                status: StackStatus::ReviewInProgress,
                tags: request.tags.clone(),
                outputs: Vec::new(),
            });
        }
        Ok(ChangeSetRef {
            change_set_id: CHANGE_SET_ID.to_string(),
            stack_id: STACK_ID.to_string(),
        })
    }

    async fn describe_change_set(&self, id: &str) -> Result<ChangeSet> {
        self.record("describe_change_set");
        let status = self
            .change_set_script
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(ChangeSetStatus::CreateComplete);
        Ok(ChangeSet {
            change_set_id: id.to_string(),
            stack_id: STACK_ID.to_string(),
            status,
            status_reason: self.change_set_reason.lock().expect("lock").clone(),
            changes: self.changes.lock().expect("lock").clone(),
        })
    }

    async fn delete_change_set(&self, _: &str) -> Result<()> {
        self.record("delete_change_set");
        Ok(())
    }

    async fn execute_change_set(&self, _: &str) -> Result<()> {
        self.record("execute_change_set");
        let kind = self
            .created
            .lock()
            .expect("lock")
            .last()
            .map_or(ChangeSetKind::Create, |c| c.kind);
        let mut script = self.stack_script.lock().expect("lock");
        if script.is_empty() {
            script.extend(match kind {
                ChangeSetKind::Create => [StackStatus::CreateInProgress, StackStatus::CreateComplete],
                ChangeSetKind::Update => [StackStatus::UpdateInProgress, StackStatus::UpdateComplete],
            });
        }
        Ok(())
    }
}

impl AssetStore for FakeCloud {
    async fn bucket_exists(&self, bucket: &str) -> bool {
        self.record("bucket_exists");
        self.buckets.lock().expect("lock").contains(bucket)
    }

    async fn create_bucket(&self, bucket: &str, _: &str) -> Result<BucketCreation> {
        self.record("create_bucket");
        self.buckets.lock().expect("lock").insert(bucket.to_string());
        if *self.conflict_on_create.lock().expect("lock") {
            return Ok(BucketCreation::AlreadyExists);
        }
        Ok(BucketCreation::Created)
    }

    async fn tag_bucket(&self, bucket: &str, tags: &[Tag]) -> Result<()> {
        self.record("tag_bucket");
        self.bucket_tags
            .lock()
            .expect("lock")
            .insert(bucket.to_string(), tags.to_vec());
        Ok(())
    }

    async fn block_public_access(&self, _: &str) -> Result<()> {
        self.record("block_public_access");
        Ok(())
    }

    async fn wait_for_bucket(&self, bucket: &str) -> Result<()> {
        self.record("wait_for_bucket");
        anyhow::ensure!(
            self.buckets.lock().expect("lock").contains(bucket),
            "bucket {bucket} never appeared"
        );
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.record(format!("put_object:{key}"));
        self.objects
            .lock()
            .expect("lock")
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        self.record("list_objects");
        Ok(self
            .objects
            .lock()
            .expect("lock")
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.record(format!("delete_object:{key}"));
        self.objects
            .lock()
            .expect("lock")
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.record("delete_bucket");
        self.buckets.lock().expect("lock").remove(bucket);
        Ok(())
    }
}

impl LocalFiles for FakeCloud {
    fn read_template(&self, _: &Path) -> Result<String> {
        Ok(self.template.lock().expect("lock").clone())
    }

    async fn archive_directory(&self, dir: &Path) -> Result<Vec<u8>> {
        self.record(format!("archive:{}", dir.display()));
        Ok(format!("zip:{}", dir.display()).into_bytes())
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/work"))
    }
}

impl ConfirmPrompt for FakeCloud {
    fn confirm(&self, _: &str) -> Result<bool> {
        self.record("confirm");
        Ok(*self.confirm_answer.lock().expect("lock"))
    }
}

/// Records progress output as indented lines.
#[derive(Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    depth: Mutex<usize>,
}

impl RecordingLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock").clone()
    }

    /// Whether some line, ignoring indentation, equals `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.lines
            .lock()
            .expect("lock")
            .iter()
            .any(|l| l.trim_start() == text)
    }
}

impl ProgressLog for RecordingLog {
    fn info(&self, message: &str) {
        let depth = *self.depth.lock().expect("lock");
        self.lines
            .lock()
            .expect("lock")
            .push(format!("{}{message}", "  ".repeat(depth)));
    }

    fn group(&self, message: &str) {
        self.info(message);
        *self.depth.lock().expect("lock") += 1;
    }

    fn group_end(&self) {
        let mut depth = self.depth.lock().expect("lock");
        *depth = depth.saturating_sub(1);
    }
}
