//! In-process contact store. Uniqueness is checked under the same lock as the write.

use super::{duplicate_email, ContactStore};
use crate::error::AppError;
use crate::model::{Contact, ContactPatch, NewContact};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct MemoryContactStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Contact>,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|c| c.email == email && Some(c.id) != except)
    }
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build the new field values from the current row and store them, all under one lock.
    fn write_with<F>(&self, id: i64, build: F) -> Result<Option<Contact>, AppError>
    where
        F: FnOnce(&Contact) -> NewContact,
    {
        let mut inner = self.lock();
        let Some(current) = inner.rows.get(&id) else {
            return Ok(None);
        };
        let contact = build(current);
        if inner.email_taken(&contact.email, Some(id)) {
            return Err(duplicate_email(&contact.email));
        }
        let row = Contact::from_new(id, contact);
        inner.rows.insert(id, row.clone());
        Ok(Some(row))
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn get(&self, id: i64) -> Result<Option<Contact>, AppError> {
        Ok(self.lock().rows.get(&id).cloned())
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Contact>, AppError> {
        Ok(self
            .lock()
            .rows
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert(&self, contact: &NewContact) -> Result<Contact, AppError> {
        let mut inner = self.lock();
        if inner.email_taken(&contact.email, None) {
            return Err(duplicate_email(&contact.email));
        }
        inner.last_id += 1;
        let row = Contact::from_new(inner.last_id, contact.clone());
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn replace(&self, id: i64, contact: &NewContact) -> Result<Option<Contact>, AppError> {
        self.write_with(id, |_| contact.clone())
    }

    async fn patch(&self, id: i64, patch: &ContactPatch) -> Result<Option<Contact>, AppError> {
        self.write_with(id, |current| patch.merge_into(current))
    }

    async fn delete(&self, id: i64) -> Result<Option<Contact>, AppError> {
        Ok(self.lock().rows.remove(&id))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
