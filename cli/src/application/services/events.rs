//! Stack event tailing.
//!
//! The tailer polls the event log on the same interval as the waiters and
//! replays events newer than its watermark. It runs on the caller's task next
//! to the operation it accompanies (see [`while_tailing`]); stopping it only
//! raises a flag, so a few trailing events may still be shown after the
//! operation has finished.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::POLL_INTERVAL;
use super::stacks::get_active_stack;
use crate::application::ports::{ProgressLog, StackApi};
use crate::domain::StackEvent;
use crate::domain::status::{EventLine, event_line};

/// Timestamp of the newest event already shown.
#[derive(Debug, Clone, Default)]
pub struct Watermark {
    latest: Option<DateTime<Utc>>,
}

impl Watermark {
    /// Start past every event in `events`.
    #[must_use]
    pub fn after(events: &[StackEvent]) -> Self {
        Self {
            latest: events.iter().map(|e| e.timestamp).max(),
        }
    }

    /// Events strictly newer than the watermark, oldest first. The watermark
    /// moves to the newest timestamp in `events`.
    pub fn advance<'e>(&mut self, events: &'e [StackEvent]) -> Vec<&'e StackEvent> {
        let latest = self.latest;
        let mut fresh: Vec<&StackEvent> = events
            .iter()
            .rev()
            .filter(|e| latest.is_none_or(|w| e.timestamp > w))
            .collect();
        fresh.sort_by_key(|e| e.timestamp);
        if let Some(newest) = events.iter().map(|e| e.timestamp).max() {
            self.latest = Some(latest.map_or(newest, |w| w.max(newest)));
        }
        fresh
    }
}

/// Cloneable stop switch for a running [`EventTailer`].
#[derive(Debug, Clone, Default)]
pub struct TailHandle {
    stopped: Arc<AtomicBool>,
}

impl TailHandle {
    /// Ask the tailer to exit at the top of its next tick.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Polls a stack's events and shows the new ones.
pub struct EventTailer<'a, A, L> {
    api: &'a A,
    log: &'a L,
    stack_name: String,
    watermark: Watermark,
    handle: TailHandle,
}

impl<'a, A: StackApi, L: ProgressLog> EventTailer<'a, A, L> {
    /// Capture the current newest event as the watermark.
    ///
    /// # Errors
    ///
    /// Returns an error if the event log cannot be read.
    pub async fn start(api: &'a A, log: &'a L, stack_id: &str, stack_name: &str) -> Result<Self> {
        let events = api.describe_stack_events(stack_id).await?;
        Ok(Self {
            api,
            log,
            stack_name: stack_name.to_string(),
            watermark: Watermark::after(&events),
            handle: TailHandle::default(),
        })
    }

    #[must_use]
    pub fn handle(&self) -> TailHandle {
        self.handle.clone()
    }

    /// Tail until stopped or until the stack is no longer active.
    ///
    /// Errors end the tailing but are not returned: event output is a
    /// courtesy and must not fail the operation it accompanies.
    pub async fn run(mut self) {
        loop {
            if self.handle.is_stopped() {
                break;
            }
            match self.poll().await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!(stack = %self.stack_name, error = %e, "stopped showing stack events");
                    break;
                }
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// One tick. Returns `false` once the stack has gone away.
    async fn poll(&mut self) -> Result<bool> {
        let Some(stack) = get_active_stack(self.api, &self.stack_name).await? else {
            return Ok(false);
        };
        let events = self.api.describe_stack_events(&stack.stack_id).await?;
        for event in self.watermark.advance(&events) {
            self.show(event);
        }
        Ok(true)
    }

    fn show(&self, event: &StackEvent) {
        match event_line(event) {
            EventLine::Stack(line) => self.log.info(&line),
            EventLine::Resource { heading, reason } => {
                self.log.group(&heading);
                if let Some(reason) = reason {
                    self.log.info(&reason);
                }
                self.log.group_end();
            }
        }
    }
}

/// Run `operation` with `tailer` alongside it on the current task, stopping
/// the tailer once the operation finishes (successfully or not).
///
/// # Errors
///
/// Returns the operation's error.
pub async fn while_tailing<A, L, T>(
    tailer: EventTailer<'_, A, L>,
    operation: impl Future<Output = Result<T>>,
) -> Result<T>
where
    A: StackApi,
    L: ProgressLog,
{
    let handle = tailer.handle();
    let (result, ()) = tokio::join!(
        async {
            let result = operation.await;
            handle.stop();
            result
        },
        tailer.run(),
    );
    result
}
