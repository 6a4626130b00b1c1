pub mod account;
pub mod organization;
pub mod person;

pub use account::Account;
pub use organization::Organization;
pub use person::Person;

/// Serde adapter for nullable timestamps stored as BSON datetimes. The
/// non-nullable fields use `chrono_datetime_as_bson_datetime`, which has no
/// `Option` counterpart.
pub(crate) mod bson_datetime_option {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(bson::DateTime::from_chrono).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bson::DateTime>::deserialize(deserializer)?.map(|dt| dt.to_chrono()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mongodb::bson;

    #[test]
    fn soft_delete_timestamp_round_trips_through_bson() {
        let mut account = Account::new(
            "alice01".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$stub".to_string(),
        );
        account.deleted_at = Some(Utc::now());

        let doc = bson::to_document(&account).unwrap();
        assert!(matches!(
            doc.get("deleted_at"),
            Some(bson::Bson::DateTime(_))
        ));

        let back: Account = bson::from_document(doc).unwrap();
        assert!(back.deleted_at.is_some());
        assert!(!back.is_active());
    }

    #[test]
    fn absent_soft_delete_serializes_as_null() {
        let account = Account::new(
            "alice01".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$stub".to_string(),
        );

        let doc = bson::to_document(&account).unwrap();
        assert!(matches!(doc.get("deleted_at"), Some(bson::Bson::Null)));
    }
}
