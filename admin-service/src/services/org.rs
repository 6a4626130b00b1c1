//! Combined organization/person creation.

use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::dtos::org::CreateOrganizationRequest;
use crate::models::{Organization, Person};
use crate::services::error::prefixed_field_errors;
use crate::services::store::EntityStore;
use crate::services::ServiceError;
use crate::utils::{hash_password, Password};

#[derive(Clone)]
pub struct OrgService {
    store: Arc<dyn EntityStore>,
}

impl OrgService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Create one organization and one person and make them mutually
    /// referential.
    ///
    /// Sequence: insert organization, insert person, set the symmetric
    /// back-references, persist both updates. No step is retried and there is
    /// no compensating rollback; a failure partway through leaves partial
    /// state, which is logged with both ids for operators to reconcile.
    pub async fn create_linked(
        &self,
        req: CreateOrganizationRequest,
    ) -> Result<(Organization, Person), ServiceError> {
        if let Err(errors) = req.organization_data.validate() {
            return Err(ServiceError::InvalidOrganizationPayload(
                prefixed_field_errors("organization_data", &errors),
            ));
        }
        if let Err(errors) = req.person_data.validate() {
            return Err(ServiceError::InvalidPersonPayload(prefixed_field_errors(
                "person_data",
                &errors,
            )));
        }

        if self
            .store
            .find_organization_by_name(&req.organization_data.name)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateOrganization);
        }

        let password_hash = hash_password(&Password::new(req.person_data.password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let mut org = Organization::new(
            req.organization_data.name,
            req.organization_data.bulk_search_limit,
            req.organization_data.risk_levels,
            req.organization_data.risk_scores,
        );

        let mut person = Person::new(
            req.person_data.name,
            req.person_data.email,
            password_hash.into_string(),
        );
        person.role_id = req.person_data.role_id;
        person.adverse_media = req.person_data.adverse_media;

        self.store.insert_organization(&org).await?;

        if let Err(e) = self.store.insert_person(&person).await {
            tracing::error!(
                organization_id = %org.id,
                "Person insert failed after organization insert; organization left unlinked"
            );
            return Err(e);
        }

        org.person_id = Some(person.id.clone());
        person.organization_id = Some(org.id.clone());
        let now = Utc::now();
        org.updated_at = now;
        person.updated_at = now;

        if let Err(e) = self.store.update_organization(&org).await {
            tracing::error!(
                organization_id = %org.id,
                person_id = %person.id,
                "Failed to persist organization back-reference; pair is inconsistent"
            );
            return Err(e);
        }

        if let Err(e) = self.store.update_person(&person).await {
            tracing::error!(
                organization_id = %org.id,
                person_id = %person.id,
                "Failed to persist person back-reference; pair is inconsistent"
            );
            return Err(e);
        }

        tracing::info!(
            organization_id = %org.id,
            person_id = %person.id,
            "Organization and person linked"
        );

        Ok((org, person))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::org::{OrganizationData, PersonData};
    use crate::services::store::testing::InMemoryStore;
    use std::collections::HashMap;

    fn request(org_name: &str) -> CreateOrganizationRequest {
        CreateOrganizationRequest {
            organization_data: OrganizationData {
                name: org_name.to_string(),
                bulk_search_limit: Some(100),
                risk_levels: HashMap::from([("sanctions".to_string(), 3)]),
                risk_scores: HashMap::new(),
            },
            person_data: PersonData {
                name: "Bob".to_string(),
                email: "b@x.com".to_string(),
                password: "pw".to_string(),
                role_id: None,
                adverse_media: false,
            },
        }
    }

    #[tokio::test]
    async fn linked_pair_has_symmetric_references() {
        let store = Arc::new(InMemoryStore::new());
        let service = OrgService::new(store.clone());

        let (org, person) = service.create_linked(request("Acme")).await.unwrap();

        assert_eq!(org.person_id.as_deref(), Some(person.id.as_str()));
        assert_eq!(person.organization_id.as_deref(), Some(org.id.as_str()));

        // The persisted documents carry the references too.
        let stored_org = store.organization(&org.id).unwrap();
        let stored_person = store.person(&person.id).unwrap();
        assert_eq!(stored_org.person_id.as_deref(), Some(person.id.as_str()));
        assert_eq!(
            stored_person.organization_id.as_deref(),
            Some(org.id.as_str())
        );
    }

    #[tokio::test]
    async fn duplicate_organization_name_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let service = OrgService::new(store.clone());

        service.create_linked(request("Acme")).await.unwrap();
        let err = service.create_linked(request("Acme")).await.unwrap_err();

        assert!(matches!(err, ServiceError::DuplicateOrganization));
        assert_eq!(store.organizations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_organization_name_reports_field_error() {
        let store = Arc::new(InMemoryStore::new());
        let service = OrgService::new(store);

        let mut req = request("");
        req.organization_data.name = String::new();

        let err = service.create_linked(req).await.unwrap_err();
        match err {
            ServiceError::InvalidOrganizationPayload(fields) => {
                assert!(fields.contains_key("organization_data.name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_person_email_reports_field_error() {
        let store = Arc::new(InMemoryStore::new());
        let service = OrgService::new(store.clone());

        let mut req = request("Acme");
        req.person_data.email = "not-an-email".to_string();

        let err = service.create_linked(req).await.unwrap_err();
        match err {
            ServiceError::InvalidPersonPayload(fields) => {
                assert!(fields.contains_key("person_data.email"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Structural validation happens before any write.
        assert!(store.organizations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn person_password_is_stored_hashed() {
        let store = Arc::new(InMemoryStore::new());
        let service = OrgService::new(store.clone());

        let (_, person) = service.create_linked(request("Acme")).await.unwrap();
        let stored = store.person(&person.id).unwrap();

        assert!(stored.password_hash.starts_with("$argon2"));
        assert_ne!(stored.password_hash, "pw");
    }
}
