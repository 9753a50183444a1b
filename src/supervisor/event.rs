//! Change and supervisor event types

use std::path::PathBuf;

use super::classify::Classification;

/// What happened to a watched path.
///
/// `Other` covers everything the restart protocol does not react to
/// (access notifications, metadata-only noise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
    Other,
}

impl From<&notify::EventKind> for ChangeKind {
    fn from(kind: &notify::EventKind) -> Self {
        match kind {
            notify::EventKind::Create(_) => ChangeKind::Created,
            notify::EventKind::Modify(_) => ChangeKind::Modified,
            notify::EventKind::Remove(_) => ChangeKind::Deleted,
            _ => ChangeKind::Other,
        }
    }
}

/// One raw filesystem change, as delivered by the observer.
///
/// Produced by the watch-set callback, consumed exactly once by the
/// classifier; not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Supervisor event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SupervisorEvent {
    SupervisorStarted {
        root: String,
        dependencies: usize,
    },
    Change {
        path: String,
        classification: Classification,
    },
    UpdateStarted,
    UpdateComplete {
        success: bool,
    },
    ServerStarted {
        pid: u32,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl SupervisorEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
