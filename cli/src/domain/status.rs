//! Human-readable status lines.
//!
//! Pure formatting and deduplication: the services decide when to poll, this
//! module decides what (if anything) the operator sees for each observation.

use std::collections::HashSet;

use crate::domain::stack::StackEvent;

/// Turn a wire status into a sentence: `"CREATE_IN_PROGRESS"` becomes
/// `"Create in progress"`.
#[must_use]
pub fn humanize_status(status: &str) -> String {
    let lowered = status.to_lowercase().replace('_', " ");
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_in_progress(status: &str) -> bool {
    status
        .to_lowercase()
        .replace('_', " ")
        .ends_with("in progress")
}

/// Deduplicates a stream of status strings into progress lines.
///
/// A line is produced when the status differs from the previous observation.
/// "In progress" statuses are shown at most once per reporter, so a stack
/// bouncing between sub-states does not repeat them. One reporter per wait.
#[derive(Debug, Default)]
pub struct StatusReporter {
    last: Option<String>,
    shown_in_progress: HashSet<String>,
}

impl StatusReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `status` and return the line to print, if any.
    pub fn observe(&mut self, status: &str) -> Option<String> {
        let changed = self.last.as_deref() != Some(status);
        self.last = Some(status.to_string());
        if !changed {
            return None;
        }
        if is_in_progress(status) && !self.shown_in_progress.insert(status.to_string()) {
            return None;
        }
        Some(humanize_status(status))
    }
}

/// Drop the redundant `". (…)"` suffix the control plane appends to reasons.
#[must_use]
pub fn short_reason(reason: &str) -> &str {
    reason.split(". (").next().unwrap_or(reason)
}

/// Lines to print for one stack event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLine {
    /// A status change of the stack itself.
    Stack(String),
    /// A resource status change, optionally followed by an indented reason.
    Resource {
        heading: String,
        reason: Option<String>,
    },
}

/// Format a stack event for display.
#[must_use]
pub fn event_line(event: &StackEvent) -> EventLine {
    let status = humanize_status(&event.status);
    if event.is_stack_level() {
        return EventLine::Stack(format!("{status}: Stack ({})", event.stack_name));
    }
    EventLine::Resource {
        heading: format!(
            "{status}: {} ({})",
            event.logical_resource_id, event.resource_type
        ),
        reason: event
            .status_reason
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| short_reason(r).to_string()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
