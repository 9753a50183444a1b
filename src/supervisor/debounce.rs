//! Single-slot debounce timer
//!
//! A restartable one-shot delay: arming cancels any pending fire and
//! restarts the full delay, so a burst of arms collapses into one fire
//! after the last of them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Identifies one `arm` call. A fire-action receives its ticket and must
/// re-validate it against the timer before acting on shared state.
pub type Ticket = u64;

/// Single-slot restartable delay primitive.
///
/// Each arm spawns a sleeper thread carrying a fresh ticket; arming or
/// canceling bumps the current ticket, so superseded sleepers find theirs
/// stale and exit without firing. At most one ticket is ever current.
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    ticket: Arc<AtomicU64>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Cancel any pending fire and schedule `action` once after the delay.
    ///
    /// The action runs on a background thread. The sleeper's own ticket
    /// check is only an early exit; a caller whose action touches state
    /// shared with `arm` must check `is_current` again under its own lock,
    /// since a new arm can race in between the check and the action.
    pub fn arm<F>(&self, action: F) -> Ticket
    where
        F: FnOnce(Ticket) + Send + 'static,
    {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.ticket);
        let delay = self.delay;

        thread::spawn(move || {
            thread::sleep(delay);
            if current.load(Ordering::SeqCst) == ticket {
                action(ticket);
            }
        });

        ticket
    }

    /// Cancel a pending fire if present; idempotent.
    pub fn cancel(&self) {
        self.ticket.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether `ticket` still identifies the most recent arm.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.ticket.load(Ordering::SeqCst) == ticket
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
