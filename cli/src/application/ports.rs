//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{
    ChangeSet, ChangeSetRef, ChangeSetRequest, Stack, StackEvent, StackStatus, StackSummary, Tag,
};

// ── Control Plane Port ────────────────────────────────────────────────────────

/// Stack and change-set operations of the remote control plane.
///
/// Every call is a single request; none of them retries.
#[allow(async_fn_in_trait)]
pub trait StackApi {
    /// List stacks whose status is one of `statuses`.
    async fn list_stacks(&self, statuses: &[StackStatus]) -> Result<Vec<StackSummary>>;
    /// Describe a stack by name or id.
    async fn describe_stack(&self, stack: &str) -> Result<Stack>;
    /// The stack's event log, newest first.
    async fn describe_stack_events(&self, stack: &str) -> Result<Vec<StackEvent>>;
    /// Delete a stack by name or id. Returns once the request is accepted.
    async fn delete_stack(&self, stack: &str) -> Result<()>;
    /// Validate a template body without creating anything.
    ///
    /// A template the control plane rejects surfaces as
    /// `DeployError::Validation`.
    async fn validate_template(&self, body: &str) -> Result<()>;
    /// Create a change set and return its identifiers.
    async fn create_change_set(&self, request: &ChangeSetRequest<'_>) -> Result<ChangeSetRef>;
    /// Describe a change set, including its proposed resource changes.
    async fn describe_change_set(&self, change_set_id: &str) -> Result<ChangeSet>;
    /// Discard a change set without executing it.
    async fn delete_change_set(&self, change_set_id: &str) -> Result<()>;
    /// Start applying a change set to its stack.
    async fn execute_change_set(&self, change_set_id: &str) -> Result<()>;
}

// ── Object Storage Port ───────────────────────────────────────────────────────

/// Outcome of a bucket creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketCreation {
    Created,
    /// The bucket already existed (HTTP 409).
    AlreadyExists,
}

/// Object-storage operations used for the asset bucket.
#[allow(async_fn_in_trait)]
pub trait AssetStore {
    /// Whether the bucket exists and is reachable with these credentials.
    async fn bucket_exists(&self, bucket: &str) -> bool;
    /// Create a bucket in `region`. A 409 is reported, not raised.
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<BucketCreation>;
    /// Replace the bucket's tag set.
    async fn tag_bucket(&self, bucket: &str, tags: &[Tag]) -> Result<()>;
    /// Enable all four public-access restrictions on the bucket.
    async fn block_public_access(&self, bucket: &str) -> Result<()>;
    /// Wait until the bucket is observably available.
    async fn wait_for_bucket(&self, bucket: &str) -> Result<()>;
    /// Upload one object.
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
    /// Keys of every object in the bucket.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>>;
    /// Delete one object.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
    /// Delete an empty bucket.
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;
}

// ── Local Filesystem Port ─────────────────────────────────────────────────────

/// Local inputs of the packaging step.
#[allow(async_fn_in_trait)]
pub trait LocalFiles {
    /// Read a template file.
    fn read_template(&self, path: &Path) -> Result<String>;
    /// Zip every file under `dir`, with entry names relative to `dir`.
    async fn archive_directory(&self, dir: &Path) -> Result<Vec<u8>>;
    /// The invocation's working directory.
    fn current_dir(&self) -> Result<PathBuf>;
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Yes/no confirmation from the operator.
pub trait ConfirmPrompt {
    /// Ask `prompt`; `Ok(false)` means declined.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Hierarchical progress output. Sync trait, no async needed.
pub trait ProgressLog {
    /// Emit one line at the current indentation.
    fn info(&self, message: &str);
    /// Emit a heading and indent everything until the matching `group_end`.
    fn group(&self, message: &str);
    /// Close the innermost group.
    fn group_end(&self);
}
