use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::models::{Organization, Person};

/// Combined creation payload. The two sub-payloads are validated
/// independently by the org service so each reports its own field errors.
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub organization_data: OrganizationData,
    pub person_data: PersonData,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrganizationData {
    #[validate(length(min = 1, message = "This field is required."))]
    pub name: String,

    pub bulk_search_limit: Option<i64>,

    #[serde(default)]
    pub risk_levels: HashMap<String, i32>,

    #[serde(default)]
    pub risk_scores: HashMap<String, i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PersonData {
    #[validate(length(min = 1, message = "This field is required."))]
    pub name: String,

    #[validate(email(message = "Enter a valid e-mail address."))]
    pub email: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,

    pub role_id: Option<String>,

    #[serde(default)]
    pub adverse_media: bool,
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub bulk_search_limit: Option<i64>,
    pub user_ids: Vec<String>,
    pub risk_levels: HashMap<String, i32>,
    pub risk_scores: HashMap<String, i32>,
    pub person_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            bulk_search_limit: org.bulk_search_limit,
            user_ids: org.user_ids,
            risk_levels: org.risk_levels,
            risk_scores: org.risk_scores,
            person_id: org.person_id,
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}

/// Person as exposed over the API (no credential fields).
#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub api_keys: Vec<String>,
    pub organization_id: Option<String>,
    pub role_id: Option<String>,
    pub adverse_media: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            email: person.email,
            api_keys: person.api_keys,
            organization_id: person.organization_id,
            role_id: person.role_id,
            adverse_media: person.adverse_media,
            created_at: person.created_at,
            updated_at: person.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkedPairResponse {
    pub organization: OrganizationResponse,
    pub person: PersonResponse,
}
