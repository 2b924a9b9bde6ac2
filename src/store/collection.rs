//! Entity Collections
//!
//! In-memory mirror of one server-side collection with selection,
//! a name filter and the state of its last request.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};

use super::RequestState;
use crate::models::{Entity, Key};

/// Case-insensitive literal substring matcher
#[derive(Debug, Clone)]
pub struct TextFilter {
    needle: Option<Regex>,
}

impl TextFilter {
    pub fn new(text: &str) -> Self {
        if text.is_empty() {
            return Self { needle: None };
        }
        let needle = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .ok();
        if needle.is_none() {
            log::warn!("[FILTER] could not compile filter {:?}", text);
        }
        Self { needle }
    }

    pub fn matches(&self, haystack: &str) -> bool {
        match &self.needle {
            Some(re) => re.is_match(haystack),
            None => true,
        }
    }
}

/// Order by label ignoring case, then by key
pub fn by_label<E: Entity>(a: &&E, b: &&E) -> Ordering {
    a.label()
        .to_lowercase()
        .cmp(&b.label().to_lowercase())
        .then_with(|| a.key().cmp(&b.key()))
}

#[derive(Debug, Clone)]
pub struct Collection<E> {
    items: Vec<E>,
    selected: Option<Key>,
    pub filter: String,
    pub request: RequestState,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            filter: String::new(),
            request: RequestState::Idle,
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, key: &Key) -> Option<usize> {
        self.items.iter().position(|e| &e.key() == key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &Key) -> Option<&E> {
        self.items.iter().find(|e| &e.key() == key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut E> {
        self.items.iter_mut().find(|e| &e.key() == key)
    }

    /// Replace every item; a selection that no longer exists is dropped
    pub fn replace_all(&mut self, items: Vec<E>) {
        self.items = items;
        if let Some(key) = self.selected.take() {
            if self.contains(&key) {
                self.selected = Some(key);
            }
        }
    }

    /// Append, or overwrite an item with the same key
    pub fn insert(&mut self, item: E) {
        match self.position(&item.key()) {
            Some(i) => self.items[i] = item,
            None => self.items.push(item),
        }
    }

    /// Upsert every item by key, later values win
    pub fn merge(&mut self, items: impl IntoIterator<Item = E>) {
        for item in items {
            self.insert(item);
        }
    }

    /// Put `item` where `old` was; the selection follows to the new key.
    /// Returns false if `old` is gone.
    pub fn replace(&mut self, old: &Key, item: E) -> bool {
        let Some(i) = self.position(old) else {
            return false;
        };
        let new_key = item.key();
        if &new_key != old {
            // a draft that got its server id may already be present from a refresh
            if let Some(dup) = self.position(&new_key) {
                self.items.remove(dup);
                return self.replace(old, item);
            }
        }
        self.items[i] = item;
        if self.selected.as_ref() == Some(old) {
            self.selected = Some(new_key);
        }
        true
    }

    pub fn remove(&mut self, key: &Key) -> Option<E> {
        let i = self.position(key)?;
        if self.selected.as_ref() == Some(key) {
            self.selected = None;
        }
        Some(self.items.remove(i))
    }

    /// Select an item; unknown keys clear the selection
    pub fn select(&mut self, key: Option<Key>) {
        self.selected = key.filter(|k| self.contains(k));
    }

    pub fn selected_key(&self) -> Option<&Key> {
        self.selected.as_ref()
    }

    /// Explicit selection if it is part of `view`, else the first of `view`
    pub fn selected_in<'a>(&self, view: &[&'a E]) -> Option<&'a E> {
        self.selected
            .as_ref()
            .and_then(|key| view.iter().copied().find(|e| &e.key() == key))
            .or_else(|| view.first().copied())
    }

    /// All items ordered by label
    pub fn sorted(&self) -> Vec<&E> {
        let mut view: Vec<&E> = self.items.iter().collect();
        view.sort_by(by_label);
        view
    }

    /// Items whose label matches `filter`, ordered by label
    pub fn filtered(&self) -> Vec<&E> {
        let filter = TextFilter::new(&self.filter);
        let mut view: Vec<&E> = self.items.iter().filter(|e| filter.matches(e.label())).collect();
        view.sort_by(by_label);
        view
    }
}
