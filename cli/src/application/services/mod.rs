//! Application services: use-case orchestration.
//!
//! Each service module implements one step of the install or uninstall flow
//! by composing domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

use std::time::Duration;

pub mod bucket;
pub mod change_set;
pub mod events;
pub mod install;
pub mod packager;
pub mod rollback;
pub mod stacks;
pub mod uninstall;
pub mod waiter;

#[cfg(test)]
pub(crate) mod test_support;

/// Delay between polls of stack status, change-set status, and events.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
