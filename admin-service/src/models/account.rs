//! Account model - login identities for the admin backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A login identity. Accounts are never hard-deleted; `deleted_at` marks
/// logical deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub active: bool,
    pub role_id: Option<String>,
    pub organization_id: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, with = "crate::models::bson_datetime_option")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account. Every field is set here, including the nullable
    /// soft-delete timestamp, so no caller has to patch defaults afterwards.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            active: true,
            role_id: None,
            organization_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_defaults() {
        let account = Account::new(
            "alice01".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$stub".to_string(),
        );

        assert!(account.active);
        assert!(account.deleted_at.is_none());
        assert!(account.role_id.is_none());
        assert!(account.organization_id.is_none());
        assert!(account.is_active());
        assert!(!account.id.is_empty());
    }
}
