use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::Account;

/// JWT service for token issuance and validation.
///
/// Tokens are opaque bearer credentials from the caller's point of view; no
/// token state is kept here beyond the signing key.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
    refresh_token_expiry_days: i64,
}

/// Claims for access tokens (short-lived)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Username the subject authenticates as
    pub username: String,
    /// Token type discriminator
    pub typ: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

/// Claims for refresh tokens (long-lived)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub username: String,
    pub typ: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Token pair returned to the client after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub refresh: String,
    pub access: String,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        if config.secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT secret must be at least 32 bytes, got {}",
                config.secret.len()
            ));
        }

        tracing::info!("JWT service initialized with HS256 signing");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        })
    }

    /// Generate an access token for an account.
    pub fn generate_access_token(
        &self,
        account_id: &str,
        username: &str,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: account_id.to_string(),
            username: username.to_string(),
            typ: "access".to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))
    }

    /// Generate a refresh token for an account.
    pub fn generate_refresh_token(
        &self,
        account_id: &str,
        username: &str,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::days(self.refresh_token_expiry_days);

        let claims = RefreshTokenClaims {
            sub: account_id.to_string(),
            username: username.to_string(),
            typ: "refresh".to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode refresh token: {}", e))
    }

    /// Issue the refresh/access pair bound to one account identity.
    pub fn issue_pair(&self, account: &Account) -> Result<TokenResponse, anyhow::Error> {
        Ok(TokenResponse {
            refresh: self.generate_refresh_token(&account.id, &account.username)?,
            access: self.generate_access_token(&account.id, &account.username)?,
        })
    }

    /// Validate a refresh token and mint a new access token from it.
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, anyhow::Error> {
        let claims = self.validate_refresh_token(refresh_token)?;
        self.generate_access_token(&claims.sub, &claims.username)
    }

    /// Validate and decode an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        if token_data.claims.typ != "access" {
            return Err(anyhow::anyhow!("Not an access token"));
        }

        Ok(token_data.claims)
    }

    /// Validate and decode a refresh token.
    pub fn validate_refresh_token(
        &self,
        token: &str,
    ) -> Result<RefreshTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<RefreshTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid refresh token: {}", e))?;

        if token_data.claims.typ != "refresh" {
            return Err(anyhow::anyhow!("Not a refresh token"));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        let config = JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        };
        JwtService::new(&config).expect("Failed to create JWT service")
    }

    #[test]
    fn rejects_short_secret() {
        let config = JwtConfig {
            secret: "too-short".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        };
        assert!(JwtService::new(&config).is_err());
    }

    #[test]
    fn access_token_round_trip() -> Result<(), anyhow::Error> {
        let service = test_service();

        let token = service.generate_access_token("account_123", "alice01")?;
        assert!(!token.is_empty());

        let claims = service.validate_access_token(&token)?;
        assert_eq!(claims.sub, "account_123");
        assert_eq!(claims.username, "alice01");
        Ok(())
    }

    #[test]
    fn refresh_token_mints_new_access_token() -> Result<(), anyhow::Error> {
        let service = test_service();

        let refresh = service.generate_refresh_token("account_123", "alice01")?;
        let access = service.refresh_access_token(&refresh)?;

        let claims = service.validate_access_token(&access)?;
        assert_eq!(claims.sub, "account_123");
        Ok(())
    }

    #[test]
    fn access_token_is_not_accepted_for_refresh() -> Result<(), anyhow::Error> {
        let service = test_service();

        let access = service.generate_access_token("account_123", "alice01")?;
        assert!(service.refresh_access_token(&access).is_err());
        Ok(())
    }

    #[test]
    fn tampered_token_is_rejected() -> Result<(), anyhow::Error> {
        let service = test_service();

        let mut token = service.generate_access_token("account_123", "alice01")?;
        token.push('x');
        assert!(service.validate_access_token(&token).is_err());
        Ok(())
    }
}
