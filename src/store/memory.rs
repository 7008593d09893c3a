//! In-memory [`ContactStore`] implementation.
//!
//! Keeps contacts in a `BTreeMap` keyed by id, with the next id held next to
//! the map under the same `RwLock` so assignment and insertion are atomic.
//! Filtering and ordering are done in Rust with the same rules the SQLite
//! backend expresses in SQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StorageResult;
use crate::models::{Contact, ContactFilters, ContactPatch, NewContact};

use super::{compare_by, matches_search, ContactStore};

struct State {
    contacts: BTreeMap<i64, Contact>,
    next_id: i64,
}

/// In-memory store for tests and ephemeral servers.
pub struct MemoryContactStore {
    state: RwLock<State>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                contacts: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored contacts.
    pub fn len(&self) -> usize {
        self.state.read().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn list(&self, filters: &ContactFilters) -> StorageResult<Vec<Contact>> {
        let state = self.state.read();
        let search = filters.effective_search();
        let mut results: Vec<Contact> = state
            .contacts
            .values()
            .filter(|c| filters.group.map_or(true, |g| c.group == g))
            .filter(|c| search.map_or(true, |term| matches_search(c, term)))
            .cloned()
            .collect();
        let (field, direction) = filters.effective_sort();
        results.sort_by(|a, b| compare_by(a, b, field, direction));
        Ok(results)
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Contact>> {
        let state = self.state.read();
        Ok(state.contacts.get(&id).cloned())
    }

    async fn create(&self, contact: NewContact) -> StorageResult<Contact> {
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;
        let stored = Contact::from_new(id, contact);
        state.contacts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, patch: &ContactPatch) -> StorageResult<Option<Contact>> {
        let mut state = self.state.write();
        Ok(state.contacts.get_mut(&id).map(|existing| {
            existing.apply(patch);
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let mut state = self.state.write();
        Ok(state.contacts.remove(&id).is_some())
    }
}
