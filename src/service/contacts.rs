//! Contact operations: validation, then the store.

use crate::error::AppError;
use crate::model::{Contact, ContactPatch, NewContact};
use crate::service::ContactValidator;
use crate::store::ContactStore;
use std::sync::Arc;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn ContactStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        ContactService { store }
    }

    /// Fetch one contact. `None` is the not-found answer, not an error.
    pub async fn get_contact(&self, id: i64) -> Result<Option<Contact>, AppError> {
        self.store.get(id).await
    }

    /// List contacts in insertion order. skip defaults to 0, limit to 100 (max 1000).
    pub async fn get_contacts(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Contact>, AppError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        self.store.list(skip, limit).await
    }

    pub async fn create_contact(&self, payload: NewContact) -> Result<Contact, AppError> {
        let payload = ContactValidator::validate(payload)?;
        let contact = self.store.insert(&payload).await.inspect_err(log_conflict)?;
        tracing::info!(id = contact.id, "contact created");
        Ok(contact)
    }

    /// Full replace: every field is overwritten, so an omitted address becomes null.
    pub async fn update_contact(
        &self,
        id: i64,
        payload: NewContact,
    ) -> Result<Option<Contact>, AppError> {
        let payload = ContactValidator::validate(payload)?;
        let contact = self.store.replace(id, &payload).await.inspect_err(log_conflict)?;
        if contact.is_some() {
            tracing::info!(id, "contact replaced");
        }
        Ok(contact)
    }

    /// Partial merge: only the fields present in the patch change.
    pub async fn patch_contact(
        &self,
        id: i64,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, AppError> {
        let patch = ContactValidator::validate_partial(patch)?;
        let contact = self.store.patch(id, &patch).await.inspect_err(log_conflict)?;
        if contact.is_some() {
            tracing::info!(id, "contact patched");
        }
        Ok(contact)
    }

    /// Remove a contact and return what it held.
    pub async fn delete_contact(&self, id: i64) -> Result<Option<Contact>, AppError> {
        let contact = self.store.delete(id).await?;
        if contact.is_some() {
            tracing::info!(id, "contact deleted");
        }
        Ok(contact)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

fn log_conflict(err: &AppError) {
    if let AppError::Conflict(msg) = err {
        tracing::warn!(reason = %msg, "contact write rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryContactStore;

    fn service() -> ContactService {
        ContactService::new(Arc::new(MemoryContactStore::new()))
    }

    fn payload(name: &str, email: &str, phone: &str) -> NewContact {
        NewContact {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let svc = service();
        let created = svc
            .create_contact(payload("Jane Doe", "jane.doe@example.com", "+987654321"))
            .await
            .unwrap();
        let fetched = svc.get_contact(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Jane Doe");
        assert_eq!(fetched.phone, "+987654321");
    }

    #[tokio::test]
    async fn unknown_id_is_absent() {
        assert_eq!(service().get_contact(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service();
        svc.create_contact(payload("Alice", "alice@example.com", "+111111111"))
            .await
            .unwrap();
        let err = svc
            .create_contact(payload("Other", "alice@example.com", "+222222222"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn invalid_payload_never_reaches_store() {
        let svc = service();
        let err = svc
            .create_contact(payload("", "alice@example.com", "+111111111"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(svc.get_contacts(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_contacts_respects_skip_and_limit() {
        let svc = service();
        for i in 0..4 {
            svc.create_contact(payload("P", &format!("p{i}@example.com"), "1234567890"))
                .await
                .unwrap();
        }
        assert_eq!(svc.get_contacts(None, None).await.unwrap().len(), 4);
        let page = svc.get_contacts(Some(1), Some(2)).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].email, "p1@example.com");
        assert!(svc.get_contacts(Some(0), Some(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let svc = service();
        let mut original = payload("Charlie", "charlie@example.com", "+333333333");
        original.address = Some("1 Elm St".into());
        let created = svc.create_contact(original).await.unwrap();
        let updated = svc
            .update_contact(
                created.id,
                payload("Charlie Updated", "charlie.updated@example.com", "+444444444"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Charlie Updated");
        assert_eq!(updated.email, "charlie.updated@example.com");
        assert_eq!(updated.phone, "+444444444");
        assert_eq!(updated.address, None);
    }

    #[tokio::test]
    async fn update_to_own_email_succeeds_but_not_to_anothers() {
        let svc = service();
        let a = svc
            .create_contact(payload("A", "a@example.com", "1234567890"))
            .await
            .unwrap();
        svc.create_contact(payload("B", "b@example.com", "1234567890"))
            .await
            .unwrap();
        let same = svc
            .update_contact(a.id, payload("A2", "a@example.com", "1234567890"))
            .await
            .unwrap();
        assert_eq!(same.map(|c| c.name), Some("A2".to_string()));
        let err = svc
            .update_contact(a.id, payload("A3", "b@example.com", "1234567890"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_unknown_id_is_absent() {
        let svc = service();
        let result = svc
            .update_contact(7, payload("X", "x@example.com", "1234567890"))
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn patch_changes_only_provided_fields() {
        let svc = service();
        let mut original = payload("Dana", "dana@example.com", "+555555555");
        original.address = Some("9 Pine Rd".into());
        let created = svc.create_contact(original).await.unwrap();
        let patched = svc
            .patch_contact(
                created.id,
                ContactPatch {
                    name: Some("  Dana S.  ".into()),
                    ..ContactPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patched.name, "Dana S.");
        assert_eq!(patched.email, "dana@example.com");
        assert_eq!(patched.address.as_deref(), Some("9 Pine Rd"));
    }

    #[tokio::test]
    async fn delete_returns_prior_state_once() {
        let svc = service();
        let created = svc
            .create_contact(payload("Dave", "dave@example.com", "+555555555"))
            .await
            .unwrap();
        let deleted = svc.delete_contact(created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert_eq!(svc.get_contact(created.id).await.unwrap(), None);
        assert_eq!(svc.delete_contact(created.id).await.unwrap(), None);
    }
}
