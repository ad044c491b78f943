//! Stack, change-set and stack-event domain types.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! Every type here is a snapshot of remote state: callers re-fetch instead of
//! holding on to one across polls.

use std::fmt;

use chrono::{DateTime, Utc};

/// Tag key under which the asset bucket name is recorded on the stack.
pub const BUCKET_NAME_TAG: &str = "bucketName";

/// Tag key recording the owning stack on the asset bucket.
pub const BUCKET_ROLE_TAG: &str = "role";

// ── Stack status ──────────────────────────────────────────────────────────────

/// Lifecycle status of a stack as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    ImportInProgress,
    ImportComplete,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
    /// A status this version does not know about, kept verbatim.
    Unknown(String),
}

/// Statuses under which a stack counts as "active" (present and not deleted).
pub const ACTIVE_STATUSES: &[StackStatus] = &[
    StackStatus::CreateInProgress,
    StackStatus::CreateComplete,
    StackStatus::RollbackInProgress,
    StackStatus::DeleteInProgress,
    StackStatus::UpdateInProgress,
    StackStatus::UpdateCompleteCleanupInProgress,
    StackStatus::UpdateComplete,
    StackStatus::UpdateRollbackInProgress,
    StackStatus::UpdateRollbackCompleteCleanupInProgress,
    StackStatus::UpdateRollbackComplete,
    StackStatus::RollbackComplete,
    StackStatus::ReviewInProgress,
];

impl StackStatus {
    /// The wire representation, e.g. `"CREATE_COMPLETE"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreateInProgress => "CREATE_IN_PROGRESS",
            Self::CreateFailed => "CREATE_FAILED",
            Self::CreateComplete => "CREATE_COMPLETE",
            Self::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            Self::RollbackFailed => "ROLLBACK_FAILED",
            Self::RollbackComplete => "ROLLBACK_COMPLETE",
            Self::DeleteInProgress => "DELETE_IN_PROGRESS",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::DeleteComplete => "DELETE_COMPLETE",
            Self::UpdateInProgress => "UPDATE_IN_PROGRESS",
            Self::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            Self::UpdateComplete => "UPDATE_COMPLETE",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            Self::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            Self::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            Self::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            Self::ReviewInProgress => "REVIEW_IN_PROGRESS",
            Self::ImportInProgress => "IMPORT_IN_PROGRESS",
            Self::ImportComplete => "IMPORT_COMPLETE",
            Self::ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
            Self::ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
            Self::ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
            Self::Unknown(s) => s,
        }
    }

    /// Parse a wire status. Unrecognised values become [`StackStatus::Unknown`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "CREATE_IN_PROGRESS" => Self::CreateInProgress,
            "CREATE_FAILED" => Self::CreateFailed,
            "CREATE_COMPLETE" => Self::CreateComplete,
            "ROLLBACK_IN_PROGRESS" => Self::RollbackInProgress,
            "ROLLBACK_FAILED" => Self::RollbackFailed,
            "ROLLBACK_COMPLETE" => Self::RollbackComplete,
            "DELETE_IN_PROGRESS" => Self::DeleteInProgress,
            "DELETE_FAILED" => Self::DeleteFailed,
            "DELETE_COMPLETE" => Self::DeleteComplete,
            "UPDATE_IN_PROGRESS" => Self::UpdateInProgress,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => Self::UpdateCompleteCleanupInProgress,
            "UPDATE_COMPLETE" => Self::UpdateComplete,
            "UPDATE_FAILED" => Self::UpdateFailed,
            "UPDATE_ROLLBACK_IN_PROGRESS" => Self::UpdateRollbackInProgress,
            "UPDATE_ROLLBACK_FAILED" => Self::UpdateRollbackFailed,
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                Self::UpdateRollbackCompleteCleanupInProgress
            }
            "UPDATE_ROLLBACK_COMPLETE" => Self::UpdateRollbackComplete,
            "REVIEW_IN_PROGRESS" => Self::ReviewInProgress,
            "IMPORT_IN_PROGRESS" => Self::ImportInProgress,
            "IMPORT_COMPLETE" => Self::ImportComplete,
            "IMPORT_ROLLBACK_IN_PROGRESS" => Self::ImportRollbackInProgress,
            "IMPORT_ROLLBACK_FAILED" => Self::ImportRollbackFailed,
            "IMPORT_ROLLBACK_COMPLETE" => Self::ImportRollbackComplete,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Any `*_COMPLETE` status, success and rollback alike.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.as_str().ends_with("_COMPLETE")
    }

    /// Whether the status names a rollback of any kind.
    #[must_use]
    pub fn is_rollback(&self) -> bool {
        self.as_str().contains("ROLLBACK")
    }

    /// Whether a stack with this status is listed as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        ACTIVE_STATUSES.contains(self)
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Stack ─────────────────────────────────────────────────────────────────────

/// Key/value pair attached to a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Output value exposed by a converged stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

/// Summary row returned when listing stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub stack_id: String,
    pub stack_name: String,
    pub status: StackStatus,
}

/// Full description of a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub stack_id: String,
    pub stack_name: String,
    pub status: StackStatus,
    pub tags: Vec<Tag>,
    pub outputs: Vec<StackOutput>,
}

impl Stack {
    /// Value of the tag with the given key, if present.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// A stack in `REVIEW_IN_PROGRESS` exists only as the target of a CREATE
    /// change set that was never executed.
    #[must_use]
    pub fn is_deployed(&self) -> bool {
        self.status != StackStatus::ReviewInProgress
    }
}

/// S3 bucket names are at most 63 characters; 33 go to `-<uuid>`.
const MAX_BUCKET_PREFIX_LEN: usize = 63 - 33;

/// Recover the asset bucket name from the stack's tags, or synthesize a
/// fresh time-ordered one (`<stack>-<uuid v7>`) when the stack has none.
#[must_use]
pub fn bucket_name_for_stack(stack_name: &str, stack: Option<&Stack>) -> String {
    if let Some(name) = stack.and_then(|s| s.tag(BUCKET_NAME_TAG)) {
        return name.to_string();
    }
    let prefix: String = stack_name
        .to_lowercase()
        .chars()
        .take(MAX_BUCKET_PREFIX_LEN)
        .collect();
    format!(
        "{}-{}",
        prefix.trim_end_matches('-'),
        uuid::Uuid::now_v7().simple()
    )
}

// ── Stack events ──────────────────────────────────────────────────────────────

/// One entry of a stack's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEvent {
    pub timestamp: DateTime<Utc>,
    pub stack_name: String,
    pub logical_resource_id: String,
    pub resource_type: String,
    pub status: String,
    pub status_reason: Option<String>,
}

impl StackEvent {
    /// Events about the stack itself carry the stack name as logical id.
    #[must_use]
    pub fn is_stack_level(&self) -> bool {
        self.logical_resource_id == self.stack_name
    }
}

// ── Change sets ───────────────────────────────────────────────────────────────

/// Whether a change set creates a new stack or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSetKind {
    Create,
    Update,
}

impl ChangeSetKind {
    /// CREATE when there is no deployed stack, UPDATE otherwise.
    #[must_use]
    pub fn for_stack(stack: Option<&Stack>) -> Self {
        match stack {
            Some(s) if s.is_deployed() => Self::Update,
            _ => Self::Create,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
        }
    }
}

/// Change-set status as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSetStatus {
    CreatePending,
    CreateInProgress,
    CreateComplete,
    DeletePending,
    DeleteInProgress,
    DeleteComplete,
    DeleteFailed,
    Failed,
    Unknown(String),
}

impl ChangeSetStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreatePending => "CREATE_PENDING",
            Self::CreateInProgress => "CREATE_IN_PROGRESS",
            Self::CreateComplete => "CREATE_COMPLETE",
            Self::DeletePending => "DELETE_PENDING",
            Self::DeleteInProgress => "DELETE_IN_PROGRESS",
            Self::DeleteComplete => "DELETE_COMPLETE",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::Failed => "FAILED",
            Self::Unknown(s) => s,
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "CREATE_PENDING" => Self::CreatePending,
            "CREATE_IN_PROGRESS" => Self::CreateInProgress,
            "CREATE_COMPLETE" => Self::CreateComplete,
            "DELETE_PENDING" => Self::DeletePending,
            "DELETE_IN_PROGRESS" => Self::DeleteInProgress,
            "DELETE_COMPLETE" => Self::DeleteComplete,
            "DELETE_FAILED" => Self::DeleteFailed,
            "FAILED" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.as_str().ends_with("_COMPLETE")
    }
}

/// Action a change set proposes for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction {
    Add,
    Modify,
    Remove,
    Other(String),
}

impl ChangeAction {
    /// Actions shown to the operator, in display order.
    pub const DISPLAYED: [ChangeAction; 3] = [Self::Add, Self::Modify, Self::Remove];

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Add" => Self::Add,
            "Modify" => Self::Modify,
            "Remove" => Self::Remove,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "Add",
            Self::Modify => "Modify",
            Self::Remove => "Remove",
            Self::Other(s) => s,
        }
    }
}

/// One proposed resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChange {
    pub action: ChangeAction,
    pub logical_resource_id: String,
    pub resource_type: String,
}

/// Full description of a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub change_set_id: String,
    pub stack_id: String,
    pub status: ChangeSetStatus,
    pub status_reason: Option<String>,
    pub changes: Vec<ResourceChange>,
}

/// Identifiers returned when a change set is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetRef {
    pub change_set_id: String,
    pub stack_id: String,
}

/// Request to create a change set.
#[derive(Debug, Clone)]
pub struct ChangeSetRequest<'a> {
    pub stack_name: &'a str,
    pub change_set_name: String,
    pub kind: ChangeSetKind,
    pub template_body: &'a str,
    pub parameters: &'a [(String, String)],
    pub tags: Vec<Tag>,
}

/// Change-set name: the stack name with a millisecond timestamp suffix.
#[must_use]
pub fn change_set_name(stack_name: &str, now: DateTime<Utc>) -> String {
    format!("{stack_name}{}", now.timestamp_millis())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
