//! `TerminalReporter` — presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::sync::Mutex;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{progress, OutputContext};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY, `step()` shows a live spinner that the next event resolves;
/// elsewhere it prints plain `"  → {message}"` lines. All output is
/// suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Mutex<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: Mutex::new(None),
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().map_or(None, |mut slot| slot.take())
    }

    fn set_spinner(&self, pb: ProgressBar) {
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
        if self.ctx.show_progress() {
            self.set_spinner(progress::spinner(message));
        } else {
            println!("  {} {message}", "→".cyan());
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some(pb) = self.take_spinner() {
            progress::finish_ok(&pb, message);
        } else {
            println!("  {} {message}", "✓".green());
        }
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let line = format!("  {} {message}", "!".yellow());
        match self.spinner.lock() {
            Ok(slot) if slot.is_some() => {
                if let Some(pb) = slot.as_ref() {
                    pb.println(line);
                }
            }
            _ => println!("{line}"),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
    }
}

/// Silent reporter for JSON output mode — the report itself is the output.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
