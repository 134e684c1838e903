//! Signal handling around chat turns.
//!
//! A reply that is streaming runs to completion, so a signal during a turn is absorbed.  At any
//! other time the process exits with [`INTERRUPTED_EXIT_CODE`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status used when a signal arrives outside a turn (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What to do when SIGINT, SIGTERM or SIGHUP arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalAction {
    /// A turn is streaming; print a notice and keep going.
    Absorb,
    /// No turn is running; exit the process.
    Exit,
}

/// Shared flag marking whether a turn is in progress.
#[derive(Clone, Debug, Default)]
pub struct TurnFlag {
    in_progress: Arc<AtomicBool>,
}

impl TurnFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a turn as started.
    pub fn begin(&self) {
        self.in_progress.store(true, Ordering::Relaxed);
    }

    /// Marks the turn as finished.
    pub fn end(&self) {
        self.in_progress.store(false, Ordering::Relaxed);
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Relaxed)
    }

    /// Decides how a signal delivered right now should be handled.
    pub fn on_signal(&self) -> SignalAction {
        if self.in_progress() {
            SignalAction::Absorb
        } else {
            SignalAction::Exit
        }
    }
}
