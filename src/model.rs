//! Contact record and request payloads.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A stored contact. `id` is assigned by the store and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Body for create (POST) and full replace (PUT). An omitted `address` is stored as null.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Body for PATCH. Only provided fields change; `"address": null` clears the address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`, via `default`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ContactPatch {
    /// Merge onto the current record, producing the full replacement payload.
    pub fn merge_into(&self, current: &Contact) -> NewContact {
        NewContact {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            phone: self.phone.clone().unwrap_or_else(|| current.phone.clone()),
            address: match &self.address {
                Some(address) => address.clone(),
                None => current.address.clone(),
            },
        }
    }
}

impl Contact {
    pub fn from_new(id: i64, new: NewContact) -> Self {
        Contact {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: new.address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Contact {
        Contact {
            id: 3,
            name: "Charlie".into(),
            email: "charlie@example.com".into(),
            phone: "+333333333".into(),
            address: Some("1 Elm St".into()),
        }
    }

    #[test]
    fn patch_distinguishes_null_from_missing_address() {
        let omitted: ContactPatch = serde_json::from_str(r#"{"name":"C"}"#).unwrap();
        assert_eq!(omitted.address, None);
        let cleared: ContactPatch = serde_json::from_str(r#"{"address":null}"#).unwrap();
        assert_eq!(cleared.address, Some(None));
        let set: ContactPatch = serde_json::from_str(r#"{"address":"2 Oak Ave"}"#).unwrap();
        assert_eq!(set.address, Some(Some("2 Oak Ave".into())));
    }

    #[test]
    fn merge_keeps_unprovided_fields() {
        let patch = ContactPatch {
            phone: Some("1234567890".into()),
            ..ContactPatch::default()
        };
        let merged = patch.merge_into(&stored());
        assert_eq!(merged.name, "Charlie");
        assert_eq!(merged.phone, "1234567890");
        assert_eq!(merged.address.as_deref(), Some("1 Elm St"));
    }

    #[test]
    fn merge_clears_address_on_null() {
        let patch = ContactPatch {
            address: Some(None),
            ..ContactPatch::default()
        };
        assert_eq!(patch.merge_into(&stored()).address, None);
    }

    #[test]
    fn new_contact_address_defaults_to_none() {
        let new: NewContact =
            serde_json::from_str(r#"{"name":"A","email":"a@b.co","phone":"1234567890"}"#).unwrap();
        assert_eq!(new.address, None);
    }
}
