//! Pristine/current tracking for editable entities.

use super::Key;

/// Live fields of an entity paired with the last server-synced copy.
///
/// `pristine` is only ever set by the constructors; a fresh server
/// response produces a fresh `Tracked`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<F> {
    key: Key,
    pristine: F,
    pub current: F,
}

impl<F: Clone + PartialEq> Tracked<F> {
    /// Entity as returned by the server
    pub fn persisted(id: impl Into<String>, fields: F) -> Self {
        Self {
            key: Key::Server(id.into()),
            pristine: fields.clone(),
            current: fields,
        }
    }

    /// Entity created locally, snapshot holds the defaults
    pub fn draft(n: u32, defaults: F) -> Self {
        Self {
            key: Key::Draft(n),
            pristine: defaults.clone(),
            current: defaults,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn is_persisted(&self) -> bool {
        self.key.is_persisted()
    }

    pub fn pristine(&self) -> &F {
        &self.pristine
    }

    pub fn is_dirty(&self) -> bool {
        !self.is_persisted() || self.current != self.pristine
    }

    pub fn restore(&mut self) {
        self.current = self.pristine.clone();
    }
}
