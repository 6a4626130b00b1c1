use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc, error::ErrorKind, error::WriteFailure, options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use crate::models::{Account, Organization, Person};
use crate::services::store::{AccountStore, EntityStore};
use crate::services::ServiceError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

/// MongoDB duplicate-key write error.
const DUPLICATE_KEY_CODE: i32 = 11000;

fn duplicate_key_index(err: &mongodb::error::Error) -> Option<String> {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY_CODE {
            return Some(write_error.message.clone());
        }
    }
    None
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    /// Create the unique indexes the validators rely on. Concurrent creations
    /// that slip past the pre-checks are rejected here by the store.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for admin-service");

        let unique = |name: &str| {
            IndexOptions::builder()
                .unique(true)
                .name(name.to_string())
                .build()
        };

        self.accounts()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique("username_unique"))
                    .build(),
                None,
            )
            .await
            .map_err(AppError::from)?;
        tracing::info!("Created unique index on accounts.username");

        self.accounts()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique("email_unique"))
                    .build(),
                None,
            )
            .await
            .map_err(AppError::from)?;
        tracing::info!("Created unique index on accounts.email");

        self.organizations()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "name": 1 })
                    .options(unique("name_unique"))
                    .build(),
                None,
            )
            .await
            .map_err(AppError::from)?;
        tracing::info!("Created unique index on organizations.name");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn accounts(&self) -> Collection<Account> {
        self.db.collection("accounts")
    }

    pub fn organizations(&self) -> Collection<Organization> {
        self.db.collection("organizations")
    }

    pub fn persons(&self) -> Collection<Person> {
        self.db.collection("persons")
    }
}

#[async_trait]
impl AccountStore for MongoDb {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError> {
        self.accounts()
            .find_one(doc! { "username": username }, None)
            .await
            .map_err(ServiceError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
        self.accounts()
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(ServiceError::Database)
    }

    async fn insert(&self, account: &Account) -> Result<(), ServiceError> {
        self.accounts()
            .insert_one(account, None)
            .await
            .map_err(|e| match duplicate_key_index(&e) {
                Some(msg) if msg.contains("username") => ServiceError::DuplicateUsername,
                Some(_) => ServiceError::DuplicateEmail,
                None => ServiceError::Database(e),
            })?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Account>, ServiceError> {
        let cursor = self
            .accounts()
            .find(None, None)
            .await
            .map_err(ServiceError::Database)?;
        cursor.try_collect().await.map_err(ServiceError::Database)
    }
}

#[async_trait]
impl EntityStore for MongoDb {
    async fn find_organization_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Organization>, ServiceError> {
        self.organizations()
            .find_one(doc! { "name": name }, None)
            .await
            .map_err(ServiceError::Database)
    }

    async fn insert_organization(&self, org: &Organization) -> Result<(), ServiceError> {
        self.organizations()
            .insert_one(org, None)
            .await
            .map_err(|e| {
                if duplicate_key_index(&e).is_some() {
                    ServiceError::DuplicateOrganization
                } else {
                    ServiceError::Database(e)
                }
            })?;
        Ok(())
    }

    async fn insert_person(&self, person: &Person) -> Result<(), ServiceError> {
        self.persons()
            .insert_one(person, None)
            .await
            .map_err(ServiceError::Database)?;
        Ok(())
    }

    async fn update_organization(&self, org: &Organization) -> Result<(), ServiceError> {
        self.organizations()
            .replace_one(doc! { "_id": &org.id }, org, None)
            .await
            .map_err(ServiceError::Database)?;
        Ok(())
    }

    async fn update_person(&self, person: &Person) -> Result<(), ServiceError> {
        self.persons()
            .replace_one(doc! { "_id": &person.id }, person, None)
            .await
            .map_err(ServiceError::Database)?;
        Ok(())
    }
}
