//! `TerminalReporter` — presentation-layer implementation of
//! `ProgressReporter`.
//!
//! Wraps `&OutputContext` so application services can emit progress events
//! without depending on any presentation type directly. On a TTY each step
//! runs a spinner until the next event; otherwise plain lines are printed.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<(ProgressBar, String)>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Finish the active spinner, marking its step as done.
    fn settle_active(&self) {
        if let Some((pb, msg)) = self.active.borrow_mut().take() {
            progress::finish_ok(&pb, &msg);
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.show_progress() {
            self.settle_active();
            let pb = progress::spinner(message);
            *self.active.borrow_mut() = Some((pb, message.to_string()));
        } else if !self.ctx.quiet {
            println!("  {} {message}", "→".cyan());
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.show_progress() {
            if let Some((pb, _)) = self.active.borrow_mut().take() {
                progress::finish_ok(&pb, message);
                return;
            }
        }
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".green());
        }
    }

    fn warn(&self, message: &str) {
        let line = format!("  {} {message}", "!".yellow());
        if let Some((pb, _)) = self.active.borrow().as_ref() {
            pb.println(line);
        } else if !self.ctx.quiet {
            println!("{line}");
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        // A run that errors out leaves its last spinner behind; clear it so
        // the error message is not mixed into a ticking line.
        if let Some((pb, _)) = self.active.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}
