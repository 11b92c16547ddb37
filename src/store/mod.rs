//! Contact persistence. The service talks to a [`ContactStore`]; PostgreSQL backs
//! production and [`MemoryContactStore`] backs tests and local runs.

mod memory;
mod postgres;

pub use memory::MemoryContactStore;
pub use postgres::{ensure_contacts_table, ensure_database_exists, PgContactStore, CONTACTS_TABLE};

use crate::error::AppError;
use crate::model::{Contact, ContactPatch, NewContact};
use async_trait::async_trait;

#[async_trait]
pub trait ContactStore: Send + Sync + 'static {
    /// Fetch one contact. `None` when the id was never assigned or has been deleted.
    async fn get(&self, id: i64) -> Result<Option<Contact>, AppError>;

    /// Contacts in id order, skipping `skip` and returning at most `limit`.
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Contact>, AppError>;

    /// Insert and return the stored row with its new id.
    /// A duplicate email fails with `AppError::Conflict` and assigns no row.
    async fn insert(&self, contact: &NewContact) -> Result<Contact, AppError>;

    /// Overwrite every field of an existing contact. `None` when the id is unknown.
    /// The contact's own email never conflicts with itself.
    async fn replace(&self, id: i64, contact: &NewContact) -> Result<Option<Contact>, AppError>;

    /// Change only the fields present in `patch`. Same conflict rules as [`ContactStore::replace`].
    async fn patch(&self, id: i64, patch: &ContactPatch) -> Result<Option<Contact>, AppError>;

    /// Remove a contact and return its prior state.
    async fn delete(&self, id: i64) -> Result<Option<Contact>, AppError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

pub(crate) fn duplicate_email(email: &str) -> AppError {
    AppError::Conflict(format!("email already registered: {}", email))
}
