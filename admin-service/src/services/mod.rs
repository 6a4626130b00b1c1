//! Services layer: business logic behind the HTTP adapters.

mod auth;
mod database;
pub mod error;
mod jwt;
mod org;
pub mod policy;
pub mod store;

pub use auth::{AuthService, CredentialCheck, CredentialOutcome, PasswordHashCheck};
pub use database::MongoDb;
pub use error::{FieldErrors, ServiceError};
pub use jwt::{AccessTokenClaims, JwtService, RefreshTokenClaims, TokenResponse};
pub use org::OrgService;
pub use policy::{PasswordPolicy, PasswordRule};
pub use store::{AccountStore, EntityStore};
