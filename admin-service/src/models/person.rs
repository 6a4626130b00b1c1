//! Person model - an organization's linked contact profile.
//!
//! Structurally close to [`Account`](super::Account) but a person is not a
//! login identity.

use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub api_keys: Vec<String>,
    pub organization_id: Option<String>,
    pub role_id: Option<String>,
    pub adverse_media: bool,
    #[serde(default)]
    pub open_search: Document,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, with = "crate::models::bson_datetime_option")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Person {
    /// Create a new person with all fields set, `deleted_at` included.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            api_keys: Vec::new(),
            organization_id: None,
            role_id: None,
            adverse_media: false,
            open_search: Document::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_person_defaults() {
        let person = Person::new(
            "Bob".to_string(),
            "b@x.com".to_string(),
            "$argon2id$stub".to_string(),
        );

        assert!(!person.adverse_media);
        assert!(person.deleted_at.is_none());
        assert!(person.organization_id.is_none());
        assert!(person.api_keys.is_empty());
    }
}
