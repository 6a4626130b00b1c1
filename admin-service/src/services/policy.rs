//! Password strength rules for registration.
//!
//! The rule set is pluggable: each rule is tried against the candidate
//! password and every violation is reported together, so a user can fix all
//! problems in one round trip.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::config::PasswordPolicyConfig;
use crate::services::ServiceError;

/// A single password strength rule. Returns a message when violated.
pub trait PasswordRule: Send + Sync {
    fn check(&self, password: &str, username: &str, email: &str) -> Option<String>;
}

pub struct MinimumLength {
    pub min: usize,
}

impl PasswordRule for MinimumLength {
    fn check(&self, password: &str, _username: &str, _email: &str) -> Option<String> {
        if password.chars().count() < self.min {
            Some(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min
            ))
        } else {
            None
        }
    }
}

static COMMON_PASSWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "password", "password1", "password123", "123456", "12345678", "123456789",
        "qwerty", "qwerty123", "abc123", "letmein", "welcome", "welcome1", "admin",
        "iloveyou", "monkey", "dragon", "sunshine", "princess", "football", "baseball",
        "master", "superman", "batman", "trustno1", "111111", "000000", "1234567890",
    ]
    .into_iter()
    .collect()
});

pub struct CommonPassword;

impl PasswordRule for CommonPassword {
    fn check(&self, password: &str, _username: &str, _email: &str) -> Option<String> {
        if COMMON_PASSWORDS.contains(password.to_lowercase().as_str()) {
            Some("This password is too common.".to_string())
        } else {
            None
        }
    }
}

/// Rejects passwords that closely match the username or the email local part.
pub struct UserSimilarity;

impl UserSimilarity {
    fn similar(password: &str, attribute: &str) -> bool {
        if attribute.is_empty() {
            return false;
        }
        let password = password.to_lowercase();
        let attribute = attribute.to_lowercase();
        if password.contains(&attribute) {
            return true;
        }
        // The attribute containing the password only counts when the password
        // covers at least half of it; otherwise any short fragment of the
        // username would be flagged.
        attribute.contains(&password)
            && password.chars().count() * 2 >= attribute.chars().count()
    }
}

impl PasswordRule for UserSimilarity {
    fn check(&self, password: &str, username: &str, email: &str) -> Option<String> {
        let email_local = email.split('@').next().unwrap_or_default();
        if Self::similar(password, username) || Self::similar(password, email_local) {
            Some("The password is too similar to the username or e-mail address.".to_string())
        } else {
            None
        }
    }
}

pub struct PasswordPolicy {
    rules: Vec<Box<dyn PasswordRule>>,
}

impl PasswordPolicy {
    pub fn from_config(config: &PasswordPolicyConfig) -> Self {
        let mut rules: Vec<Box<dyn PasswordRule>> = vec![Box::new(MinimumLength {
            min: config.min_length,
        })];
        if config.reject_common {
            rules.push(Box::new(CommonPassword));
        }
        if config.reject_user_similarity {
            rules.push(Box::new(UserSimilarity));
        }
        Self { rules }
    }

    pub fn with_rules(rules: Vec<Box<dyn PasswordRule>>) -> Self {
        Self { rules }
    }

    /// Run every rule; all violations are accumulated into one error.
    pub fn validate(
        &self,
        password: &str,
        username: &str,
        email: &str,
    ) -> Result<(), ServiceError> {
        let violations: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(password, username, email))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::WeakPassword(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::from_config(&PasswordPolicyConfig {
            min_length: 8,
            reject_common: true,
            reject_user_similarity: true,
        })
    }

    #[test]
    fn accepts_strong_password() {
        assert!(policy()
            .validate("correct-horse-battery", "alice01", "alice@example.com")
            .is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let err = policy()
            .validate("short", "alice01", "alice@example.com")
            .unwrap_err();
        match err {
            ServiceError::WeakPassword(messages) => {
                assert!(messages.iter().any(|m| m.contains("too short")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_common_password() {
        let err = policy()
            .validate("password123", "alice01", "alice@example.com")
            .unwrap_err();
        match err {
            ServiceError::WeakPassword(messages) => {
                assert!(messages.iter().any(|m| m.contains("too common")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_password_matching_username() {
        let err = policy()
            .validate("alice01-extra", "alice01", "alice@example.com")
            .unwrap_err();
        match err {
            ServiceError::WeakPassword(messages) => {
                assert!(messages.iter().any(|m| m.contains("too similar")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_fragment_of_username_is_not_similar() {
        // Standalone similarity rule, no minimum-length backstop.
        let policy = PasswordPolicy::with_rules(vec![Box::new(UserSimilarity)]);

        // Two characters out of a fourteen-character username share too
        // little to count as similar.
        assert!(policy
            .validate("ab", "absolutely_not", "someone@example.com")
            .is_ok());

        // A password covering most of the username is still flagged.
        let err = policy
            .validate("alice0", "alice01", "someone@example.com")
            .unwrap_err();
        assert!(matches!(err, ServiceError::WeakPassword(_)));
    }

    #[test]
    fn accumulates_all_violations() {
        // "qwerty" is short, common, and dissimilar: two violations together.
        let err = policy()
            .validate("qwerty", "alice01", "alice@example.com")
            .unwrap_err();
        match err {
            ServiceError::WeakPassword(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
