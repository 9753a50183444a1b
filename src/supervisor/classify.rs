//! Change classification
//!
//! Maps a raw change to one of {internal, dependency, ignored} by prefix
//! matching the path against the configured dependency roots.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::event::{ChangeEvent, ChangeKind};

/// What a change means for the restart protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Working-tree change: restart only
    Internal,
    /// Dependency-tree change: update, then restart
    Dependency,
    /// Event kind outside {created, modified, deleted}: no reaction
    Ignored,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Internal => write!(f, "internal"),
            Classification::Dependency => write!(f, "dependency"),
            Classification::Ignored => write!(f, "ignored"),
        }
    }
}

/// Pure classifier over a fixed set of dependency roots.
///
/// Roots are canonicalized once at construction so prefix matching agrees
/// with the absolute paths the observer reports; `classify` itself touches
/// no filesystem state.
#[derive(Debug, Clone)]
pub struct Classifier {
    dependency_roots: Vec<PathBuf>,
}

impl Classifier {
    pub fn new(dependency_roots: &[PathBuf]) -> Self {
        let dependency_roots = dependency_roots
            .iter()
            .map(|root| root.canonicalize().unwrap_or_else(|_| root.clone()))
            .collect();
        Self { dependency_roots }
    }

    pub fn classify(&self, event: &ChangeEvent) -> Classification {
        if event.kind == ChangeKind::Other {
            return Classification::Ignored;
        }
        if self
            .dependency_roots
            .iter()
            .any(|root| event.path.starts_with(root))
        {
            return Classification::Dependency;
        }
        Classification::Internal
    }
}
