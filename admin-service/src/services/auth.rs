//! Registration and login validation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::dtos::auth::{LoginRequest, RegisterRequest};
use crate::models::Account;
use crate::services::store::AccountStore;
use crate::services::{PasswordPolicy, ServiceError};
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

/// Outcome of one credential-check strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOutcome {
    Accepted,
    Rejected,
    /// The strategy does not apply to this account; try the next one.
    Skipped,
}

/// A single credential-check strategy. Strategies are tried in the order they
/// are registered; the first `Accepted` wins.
#[async_trait]
pub trait CredentialCheck: Send + Sync {
    fn name(&self) -> &'static str;
    async fn authenticate(&self, account: &Account, password: &Password) -> CredentialOutcome;
}

/// Verifies the supplied password against the account's stored Argon2 hash.
pub struct PasswordHashCheck;

#[async_trait]
impl CredentialCheck for PasswordHashCheck {
    fn name(&self) -> &'static str {
        "password_hash"
    }

    async fn authenticate(&self, account: &Account, password: &Password) -> CredentialOutcome {
        let stored = PasswordHashString::new(account.password_hash.clone());
        match verify_password(password, &stored) {
            Ok(()) => CredentialOutcome::Accepted,
            Err(_) => CredentialOutcome::Rejected,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    policy: Arc<PasswordPolicy>,
    checks: Vec<Arc<dyn CredentialCheck>>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountStore>, policy: PasswordPolicy) -> Self {
        Self {
            accounts,
            policy: Arc::new(policy),
            checks: vec![Arc::new(PasswordHashCheck)],
        }
    }

    /// Replace the ordered credential-check strategy list.
    pub fn with_checks(mut self, checks: Vec<Arc<dyn CredentialCheck>>) -> Self {
        self.checks = checks;
        self
    }

    /// Validate a registration payload and persist the new account.
    ///
    /// Rule categories fail fast in order (username, email, password strength,
    /// password match); password-rule violations are accumulated together.
    pub async fn register(&self, req: RegisterRequest) -> Result<Account, ServiceError> {
        let username = req.username.trim().to_string();
        let email = req.email.trim().to_lowercase();

        // Length limits apply to what gets stored, so the trimmed username is
        // what has to satisfy them.
        let length = username.chars().count();
        if length < 5 {
            return Err(ServiceError::InvalidUsername(
                "Ensure this field has at least 5 characters.".to_string(),
            ));
        }
        if length > 120 {
            return Err(ServiceError::InvalidUsername(
                "Ensure this field has no more than 120 characters.".to_string(),
            ));
        }

        if self.accounts.find_by_username(&username).await?.is_some() {
            return Err(ServiceError::DuplicateUsername);
        }

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        self.policy.validate(&req.password1, &username, &email)?;

        if req.password1 != req.password2 {
            return Err(ServiceError::PasswordMismatch);
        }

        let password_hash = hash_password(&Password::new(req.password1))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let account = Account::new(username, email, password_hash.into_string());
        self.accounts.insert(&account).await?;

        tracing::info!(account_id = %account.id, "Account registered");

        Ok(account)
    }

    /// Validate a login payload and return the matching account.
    ///
    /// The API accepts an email, but authentication runs by username: the
    /// email is resolved to an account first, then the credential-check
    /// strategies are tried in sequence against it.
    pub async fn login(&self, req: LoginRequest) -> Result<Account, ServiceError> {
        let email = req.email.trim().to_lowercase();

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::UnknownEmail)?;

        let password = Password::new(req.password);
        let mut accepted = false;
        for check in &self.checks {
            match check.authenticate(&account, &password).await {
                CredentialOutcome::Accepted => {
                    accepted = true;
                    break;
                }
                CredentialOutcome::Rejected => {
                    tracing::debug!(
                        strategy = check.name(),
                        username = %account.username,
                        "Credential check rejected"
                    );
                }
                CredentialOutcome::Skipped => continue,
            }
        }

        if !accepted {
            return Err(ServiceError::InvalidCredentials);
        }

        if !account.is_active() {
            return Err(ServiceError::AccountDisabled);
        }

        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(account)
    }
}
