//! Persistence boundaries for the two flows.
//!
//! The account flow and the org/person linking flow each talk to the document
//! store through a narrow trait so the business logic can be exercised against
//! an in-memory double in tests.

use async_trait::async_trait;

use crate::models::{Account, Organization, Person};
use crate::services::ServiceError;

/// Persistence access for login identities.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError>;
    async fn insert(&self, account: &Account) -> Result<(), ServiceError>;
    async fn list_all(&self) -> Result<Vec<Account>, ServiceError>;
}

/// Persistence access for the organization/person linking flow.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn find_organization_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Organization>, ServiceError>;
    async fn insert_organization(&self, org: &Organization) -> Result<(), ServiceError>;
    async fn insert_person(&self, person: &Person) -> Result<(), ServiceError>;
    async fn update_organization(&self, org: &Organization) -> Result<(), ServiceError>;
    async fn update_person(&self, person: &Person) -> Result<(), ServiceError>;
}

#[cfg(test)]
pub mod testing {
    //! In-memory store double mirroring the unique indexes the real store
    //! creates at startup.

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryStore {
        pub accounts: Mutex<Vec<Account>>,
        pub organizations: Mutex<Vec<Organization>>,
        pub persons: Mutex<Vec<Person>>,
    }

    impl InMemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn account_count(&self) -> usize {
            self.accounts.lock().unwrap().len()
        }

        pub fn organization(&self, id: &str) -> Option<Organization> {
            self.organizations
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.id == id)
                .cloned()
        }

        pub fn person(&self, id: &str) -> Option<Person> {
            self.persons
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned()
        }
    }

    #[async_trait]
    impl AccountStore for InMemoryStore {
        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<Account>, ServiceError> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.username == username)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.email == email)
                .cloned())
        }

        async fn insert(&self, account: &Account) -> Result<(), ServiceError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.iter().any(|a| a.username == account.username) {
                return Err(ServiceError::DuplicateUsername);
            }
            if accounts.iter().any(|a| a.email == account.email) {
                return Err(ServiceError::DuplicateEmail);
            }
            accounts.push(account.clone());
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<Account>, ServiceError> {
            Ok(self.accounts.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl EntityStore for InMemoryStore {
        async fn find_organization_by_name(
            &self,
            name: &str,
        ) -> Result<Option<Organization>, ServiceError> {
            Ok(self
                .organizations
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.name == name)
                .cloned())
        }

        async fn insert_organization(&self, org: &Organization) -> Result<(), ServiceError> {
            let mut orgs = self.organizations.lock().unwrap();
            if orgs.iter().any(|o| o.name == org.name) {
                return Err(ServiceError::DuplicateOrganization);
            }
            orgs.push(org.clone());
            Ok(())
        }

        async fn insert_person(&self, person: &Person) -> Result<(), ServiceError> {
            self.persons.lock().unwrap().push(person.clone());
            Ok(())
        }

        async fn update_organization(&self, org: &Organization) -> Result<(), ServiceError> {
            let mut orgs = self.organizations.lock().unwrap();
            match orgs.iter_mut().find(|o| o.id == org.id) {
                Some(existing) => {
                    *existing = org.clone();
                    Ok(())
                }
                None => Err(ServiceError::Internal(anyhow::anyhow!(
                    "organization {} not found",
                    org.id
                ))),
            }
        }

        async fn update_person(&self, person: &Person) -> Result<(), ServiceError> {
            let mut persons = self.persons.lock().unwrap();
            match persons.iter_mut().find(|p| p.id == person.id) {
                Some(existing) => {
                    *existing = person.clone();
                    Ok(())
                }
                None => Err(ServiceError::Internal(anyhow::anyhow!(
                    "person {} not found",
                    person.id
                ))),
            }
        }
    }
}
