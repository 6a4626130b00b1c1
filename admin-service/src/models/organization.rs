//! Organization model - tenant records owning risk configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A tenant. `person_id` is populated by the linking flow once the
/// organization's primary person has been created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub bulk_search_limit: Option<i64>,
    #[serde(default)]
    pub user_ids: Vec<String>,
    #[serde(default)]
    pub risk_levels: HashMap<String, i32>,
    #[serde(default)]
    pub risk_scores: HashMap<String, i32>,
    pub person_id: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(
        name: String,
        bulk_search_limit: Option<i64>,
        risk_levels: HashMap<String, i32>,
        risk_scores: HashMap<String, i32>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            bulk_search_limit,
            user_ids: Vec::new(),
            risk_levels,
            risk_scores,
            person_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
