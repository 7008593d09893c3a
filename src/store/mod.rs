//! Storage abstraction for the contact book.
//!
//! The [`ContactStore`] trait is the persistence contract every backend
//! satisfies, enabling the HTTP layer and CLI to run unchanged over either
//! implementation:
//!
//! | Backend | Module | Use |
//! |---------|--------|-----|
//! | [`MemoryContactStore`] | [`memory`] | tests, reference semantics |
//! | [`SqliteContactStore`] | [`sqlite`] | persistent storage |
//!
//! Exactly one backend is live per process, chosen by `[storage].backend`
//! in the configuration (see [`open_store`]).
//!
//! # Shared semantics
//!
//! Both backends must return identical results for identical inputs:
//!
//! - group filtering is exact equality on the stored key;
//! - search is a substring match that folds ASCII case only, over first
//!   name, last name, phone number, email and position;
//! - ordering compares with ASCII case folded, then by byte, and breaks
//!   ties by ascending id.
//!
//! These are exactly SQLite's `LIKE` and `COLLATE NOCASE` rules, which the
//! in-memory backend reproduces with [`matches_search`] and [`compare_by`].

pub mod memory;
pub mod query;
pub mod sqlite;

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, StorageBackend};
use crate::error::StorageResult;
use crate::models::{Contact, ContactFilters, ContactPatch, NewContact, SortDirection, SortField};

pub use memory::MemoryContactStore;
pub use sqlite::SqliteContactStore;

/// Abstract contact storage backend.
///
/// "Not found" is never an error: [`get`](ContactStore::get) and
/// [`update`](ContactStore::update) return `None`, and
/// [`delete`](ContactStore::delete) returns `false`. Errors are reserved
/// for backend failures.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts matching `filters`, in the requested order.
    async fn list(&self, filters: &ContactFilters) -> StorageResult<Vec<Contact>>;

    /// The contact with `id`, if any.
    async fn get(&self, id: i64) -> StorageResult<Option<Contact>>;

    /// Persist a new contact under a freshly assigned id. Ids are never
    /// reused, even after the record holding one is deleted.
    async fn create(&self, contact: NewContact) -> StorageResult<Contact>;

    /// Merge the supplied fields of `patch` onto the record with `id`.
    /// An empty patch returns the record unchanged.
    async fn update(&self, id: i64, patch: &ContactPatch) -> StorageResult<Option<Contact>>;

    /// Remove the record with `id`; returns whether one was removed.
    async fn delete(&self, id: i64) -> StorageResult<bool>;
}

/// Open the backend named in the configuration.
///
/// The SQLite backend creates its schema if missing, so a fresh database
/// path works without a separate `init`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn ContactStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory contact store");
            Ok(Arc::new(MemoryContactStore::new()))
        }
        StorageBackend::Sqlite => {
            let pool = crate::db::connect(config).await?;
            crate::migrate::create_schema(&pool).await?;
            tracing::info!(path = %config.db.path.display(), "using sqlite contact store");
            Ok(Arc::new(SqliteContactStore::new(pool)))
        }
    }
}

/// Whether `contact` contains `term` in any searchable field.
pub fn matches_search(contact: &Contact, term: &str) -> bool {
    let needle = term.to_ascii_lowercase();
    let fields = [
        Some(contact.first_name.as_str()),
        Some(contact.last_name.as_str()),
        Some(contact.phone_number.as_str()),
        contact.email.as_deref(),
        contact.position.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|value| value.to_ascii_lowercase().contains(&needle))
}

/// Total order used for listing.
pub fn compare_by(a: &Contact, b: &Contact, field: SortField, direction: SortDirection) -> Ordering {
    let (x, y) = match field {
        SortField::LastName => (&a.last_name, &b.last_name),
        SortField::FirstName => (&a.first_name, &b.first_name),
    };
    let ord = nocase_cmp(x, y);
    let ord = match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    };
    ord.then(a.id.cmp(&b.id))
}

fn nocase_cmp(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}
