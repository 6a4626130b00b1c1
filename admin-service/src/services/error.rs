use service_core::error::AppError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> list of messages, serialized verbatim in 400 responses.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub fn field_error(field: &str, message: &str) -> FieldErrors {
    let mut fields = FieldErrors::new();
    fields.insert(field.to_string(), vec![message.to_string()]);
    fields
}

/// Flatten `validator` errors under a payload prefix, e.g.
/// `person_data.email -> ["Enter a valid e-mail address."]`.
pub fn prefixed_field_errors(prefix: &str, errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            (format!("{}.{}", prefix, field), messages)
        })
        .collect()
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("A user is already registered with this username.")]
    DuplicateUsername,

    #[error("A user is already registered with this e-mail address.")]
    DuplicateEmail,

    #[error("Password does not meet the configured strength rules")]
    WeakPassword(Vec<String>),

    #[error("The two password fields didn't match.")]
    PasswordMismatch,

    #[error("No user account attached to the provided email.")]
    UnknownEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is disabled.")]
    AccountDisabled,

    #[error("An organization with this name already exists.")]
    DuplicateOrganization,

    #[error("Invalid organization payload")]
    InvalidOrganizationPayload(FieldErrors),

    #[error("Invalid person payload")]
    InvalidPersonPayload(FieldErrors),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidUsername(message) => {
                AppError::FieldErrors(field_error("username", &message))
            }
            ServiceError::DuplicateUsername => AppError::FieldErrors(field_error(
                "username",
                "A user is already registered with this username.",
            )),
            ServiceError::DuplicateEmail => AppError::FieldErrors(field_error(
                "email",
                "A user is already registered with this e-mail address.",
            )),
            ServiceError::WeakPassword(messages) => {
                let mut fields = FieldErrors::new();
                fields.insert("password1".to_string(), messages);
                AppError::FieldErrors(fields)
            }
            ServiceError::PasswordMismatch => AppError::FieldErrors(field_error(
                "non_field_errors",
                "The two password fields didn't match.",
            )),
            ServiceError::UnknownEmail => AppError::FieldErrors(field_error(
                "email",
                "No user account attached to the provided email.",
            )),
            ServiceError::InvalidCredentials => {
                AppError::BadRequest(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::AccountDisabled => {
                AppError::BadRequest(anyhow::anyhow!("User account is disabled."))
            }
            ServiceError::DuplicateOrganization => AppError::FieldErrors(field_error(
                "organization_data.name",
                "An organization with this name already exists.",
            )),
            ServiceError::InvalidOrganizationPayload(fields)
            | ServiceError::InvalidPersonPayload(fields) => AppError::FieldErrors(fields),
        }
    }
}
