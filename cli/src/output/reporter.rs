//! `TerminalLog`: Presentation-layer implementation of `ProgressLog`.
//!
//! Application services emit a tree of progress lines; this renders each one
//! as a dash-prefixed line indented two spaces per open group.

use std::sync::atomic::{AtomicUsize, Ordering};

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressLog;
use crate::output::{OutputContext, Styles};

/// Terminal progress log that wraps an `OutputContext`.
///
/// Every line is suppressed when `ctx.quiet`; group depth is still tracked.
pub struct TerminalLog<'a> {
    ctx: &'a OutputContext,
    depth: AtomicUsize,
}

impl<'a> TerminalLog<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            depth: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    fn emit(&self, message: &str, heading: bool) {
        if !self.ctx.quiet {
            let depth = self.depth.load(Ordering::SeqCst);
            println!("{}", format_line(&self.ctx.styles, depth, message, heading));
        }
    }
}

/// One rendered progress line.
#[must_use]
pub fn format_line(styles: &Styles, depth: usize, message: &str, heading: bool) -> String {
    let indent = "  ".repeat(depth);
    let dash = "-".style(styles.dim);
    if heading {
        format!("{indent}{dash} {}", message.style(styles.group))
    } else {
        format!("{indent}{dash} {message}")
    }
}

impl ProgressLog for TerminalLog<'_> {
    fn info(&self, message: &str) {
        self.emit(message, false);
    }

    fn group(&self, message: &str) {
        self.emit(message, true);
        self.depth.fetch_add(1, Ordering::SeqCst);
    }

    fn group_end(&self) {
        let _ = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| Some(d.saturating_sub(1)));
    }
}
