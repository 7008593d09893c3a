//! SQLite-backed [`ContactStore`] implementation.
//!
//! Executes the statements produced by [`super::query`] against the
//! `contacts` table. Writes use `RETURNING` so the stored row comes back
//! from the same statement that changed it.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

use crate::error::{StorageError, StorageResult};
use crate::models::{
    Contact, ContactField, ContactFilters, ContactGroup, ContactPatch, Gender, NewContact,
};

use super::query::{self, Bind, BuiltQuery};
use super::ContactStore;

/// SQLite implementation of the [`ContactStore`] trait.
pub struct SqliteContactStore {
    pool: SqlitePool,
}

impl SqliteContactStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn prepare(built: &BuiltQuery) -> sqlx::query::Query<'_, Sqlite, SqliteArguments<'_>> {
    built
        .binds
        .iter()
        .fold(sqlx::query(&built.sql), |q, bind| match bind {
            Bind::Text(v) => q.bind(v.clone()),
            Bind::Int(v) => q.bind(*v),
        })
}

fn text(row: &SqliteRow, field: ContactField) -> StorageResult<String> {
    Ok(row.try_get(field.column())?)
}

fn opt_text(row: &SqliteRow, field: ContactField) -> StorageResult<Option<String>> {
    Ok(row.try_get(field.column())?)
}

fn row_to_contact(row: &SqliteRow) -> StorageResult<Contact> {
    let id: i64 = row.try_get("id")?;
    let group = text(row, ContactField::Group)?
        .parse::<ContactGroup>()
        .map_err(|e| StorageError::Corrupt {
            id,
            message: format!("group: {}", e),
        })?;
    let gender = text(row, ContactField::Gender)?
        .parse::<Gender>()
        .map_err(|e| StorageError::Corrupt {
            id,
            message: format!("gender: {}", e),
        })?;

    Ok(Contact {
        id,
        first_name: text(row, ContactField::FirstName)?,
        last_name: text(row, ContactField::LastName)?,
        phone_number: text(row, ContactField::PhoneNumber)?,
        group,
        position: opt_text(row, ContactField::Position)?,
        office_home_number: opt_text(row, ContactField::OfficeHomeNumber)?,
        gender,
        additional_phone1: opt_text(row, ContactField::AdditionalPhone1)?,
        additional_phone2: opt_text(row, ContactField::AdditionalPhone2)?,
        additional_phone3: opt_text(row, ContactField::AdditionalPhone3)?,
        email: opt_text(row, ContactField::Email)?,
        notes: opt_text(row, ContactField::Notes)?,
        address: opt_text(row, ContactField::Address)?,
    })
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    async fn list(&self, filters: &ContactFilters) -> StorageResult<Vec<Contact>> {
        let built = query::build_list(filters);
        tracing::debug!(sql = %built.sql, binds = built.binds.len(), "listing contacts");
        let rows = prepare(&built).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_contact).collect()
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Contact>> {
        let built = query::build_get(id);
        let row = prepare(&built).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_contact).transpose()
    }

    async fn create(&self, contact: NewContact) -> StorageResult<Contact> {
        let built = query::build_insert(&contact);
        let row = prepare(&built).fetch_one(&self.pool).await?;
        row_to_contact(&row)
    }

    async fn update(&self, id: i64, patch: &ContactPatch) -> StorageResult<Option<Contact>> {
        let built = match query::build_update(id, patch) {
            Some(built) => built,
            None => return self.get(id).await,
        };
        let row = prepare(&built).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_contact).transpose()
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let built = query::build_delete(id);
        let result = prepare(&built).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
