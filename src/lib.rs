//! devloop - development-loop supervisor
//!
//! devloop watches a working tree plus a fixed set of external dependency
//! trees and restarts a long-running dev server when they change. Bursts of
//! filesystem events are debounced into a single restart, and a change in a
//! dependency tree runs a configured update command before the restart.

pub mod config;
pub mod error;
pub mod supervisor;

// Re-exports for convenience
pub use config::{Config, ConfigWarning};
pub use error::{DevloopError, DevloopResult};
pub use supervisor::{
    supervise, ChangeEvent, ChangeKind, Classification, Classifier, DebounceTimer, ProcessHandle,
    SuperviseOptions, Supervisor, SupervisorEvent,
};
