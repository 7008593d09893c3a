//! # Contact Book
//!
//! A personal contact book: a JSON HTTP API over a pluggable contact store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────────┐   ┌──────────┐
//! │  HTTP    │──▶│ Validation │──▶│ ContactStore │──▶│  SQLite  │
//! │ (Axum)   │   │            │   │    trait     │   │ / memory │
//! └──────────┘   └────────────┘   └──────────────┘   └──────────┘
//!       ▲                                ▲
//!       └────────── CLI (contacts) ──────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! contacts init                  # create database
//! contacts serve                 # start HTTP server
//! contacts list --group doctors --search ahm
//! contacts get 3
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`models`] | `Contact`, enumerations, create/update/filter shapes |
//! | [`validation`] | Boundary checks for bodies and query parameters |
//! | [`error`] | `ValidationError` and `StorageError` |
//! | [`store`] | `ContactStore` trait, in-memory and SQLite backends, SQL builder |
//! | [`server`] | HTTP API (Axum) with CORS and request tracing |
//! | [`commands`] | CLI list/get/delete output |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Idempotent schema creation |
//! | [`logging`] | `tracing` subscriber setup |

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod server;
pub mod store;
pub mod validation;

pub use error::{FieldViolation, StorageError, StorageResult, ValidationError};
pub use models::{Contact, ContactFilters, ContactGroup, ContactPatch, Gender, NewContact};
pub use store::{ContactStore, MemoryContactStore, SqliteContactStore};
