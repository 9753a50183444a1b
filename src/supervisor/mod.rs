//! Development-loop supervisor
//!
//! Implements the watch/restart loop with:
//! - Debouncing (1s default, full delay reset on every new event)
//! - Dependency-change detection (update step before the restart)
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod classify;
mod debounce;
mod event;
mod process;
mod run;

pub use classify::{Classification, Classifier};
pub use debounce::{DebounceTimer, Ticket};
pub use event::{ChangeEvent, ChangeKind, SupervisorEvent};
pub use process::{run_to_completion, ProcessHandle};
pub use run::{supervise, EventSink, SuperviseOptions, Supervisor};
