//! Core Entity Trait
//!
//! Every value held by a collection store has a stable key and a label
//! used for filtering and sorting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a client-side entity
///
/// `Server` keys are issued by the backend; `Draft` keys are handed out
/// locally for entities that were never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Server(String),
    Draft(u32),
}

impl Key {
    pub fn server(id: impl Into<String>) -> Self {
        Key::Server(id.into())
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Key::Server(_))
    }

    /// Server identifier, if the entity was persisted
    pub fn server_id(&self) -> Option<&str> {
        match self {
            Key::Server(id) => Some(id),
            Key::Draft(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Server(id) => write!(f, "{}", id),
            Key::Draft(n) => write!(f, "draft#{}", n),
        }
    }
}

/// Core trait for all entities kept in a collection store
pub trait Entity: Clone {
    /// Returns the entity's key
    fn key(&self) -> Key;

    /// Text used by name filters and default ordering
    fn label(&self) -> &str;
}
