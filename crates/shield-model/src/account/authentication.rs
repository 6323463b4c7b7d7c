use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog::authentication as rules;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::Export;

/// Error constructing [`Authentication`] credentials.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// `email` failed its chain.
    #[error("login e-mail is not valid:\n{0}")]
    InvalidEmail(ValidationVerdict),

    /// `password` failed its chain.
    #[error("login password is not valid:\n{0}")]
    InvalidPassword(ValidationVerdict),
}

impl FieldError for AuthenticationError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidEmail(v) | Self::InvalidPassword(v) => Some(v),
        }
    }
}

static SCHEMA: Schema<AuthenticationError> = Schema::new(
    "authentication",
    &[
        FieldSpec {
            name: "email",
            check: Check::Chain(&rules::EMAIL),
            presence: Presence::Required,
            error: AuthenticationError::InvalidEmail,
        },
        FieldSpec {
            name: "password",
            check: Check::Chain(&rules::PASSWORD),
            presence: Presence::Required,
            error: AuthenticationError::InvalidPassword,
        },
    ],
);

/// Unvalidated login fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAuthentication {
    /// Login e-mail.
    pub email: Option<RawField<String>>,
    /// Login password.
    pub password: Option<RawField<String>>,
}

impl RawAuthentication {
    fn inputs(&self) -> [(&'static str, Input<'_>); 2] {
        [
            ("email", self.email.input()),
            ("password", self.password.input()),
        ]
    }
}

/// Well-formed login credentials. Whether they match an account is not
/// decided here.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Authentication {
    email: String,
    password: String,
}

impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authentication")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Authentication {
    /// Validate and build credentials.
    pub fn new(email: &str, password: &str) -> Result<Self, AuthenticationError> {
        Self::from_raw(&RawAuthentication {
            email: supplied(email),
            password: supplied(password),
        })
    }

    /// Validate raw fields, failing on the first offending one.
    pub fn from_raw(raw: &RawAuthentication) -> Result<Self, AuthenticationError> {
        SCHEMA.construct(&raw.inputs(), || {
            Ok(Self {
                email: raw.email.text().to_string(),
                password: raw.password.text().to_string(),
            })
        })
    }

    /// Every field error, in declaration order.
    pub fn audit(raw: &RawAuthentication) -> Vec<AuthenticationError> {
        SCHEMA.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<AuthenticationError> {
        &SCHEMA
    }

    /// Login e-mail.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Login password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl_validating_deserialize!(Authentication, RawAuthentication, |raw| {
    Authentication::from_raw(&raw)
});

impl Export for Authentication {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wellformed_credentials() {
        let auth = Authentication::new("jane@example.com", "Secret12").unwrap();
        assert_eq!(auth.email(), "jane@example.com");
        assert!(!format!("{auth:?}").contains("Secret12"));
    }

    #[test]
    fn email_checked_before_password() {
        let err = Authentication::new("nope", "x").unwrap_err();
        assert!(matches!(err, AuthenticationError::InvalidEmail(_)));
        let err = Authentication::new("jane@example.com", "x").unwrap_err();
        assert!(matches!(err, AuthenticationError::InvalidPassword(_)));
    }

    #[test]
    fn missing_password() {
        let raw = RawAuthentication {
            email: Some("jane@example.com".into()),
            password: None,
        };
        let err = Authentication::from_raw(&raw).unwrap_err();
        assert!(err.is_missing());
        assert_eq!(Authentication::audit(&raw).len(), 1);
    }

    #[test]
    fn numeric_password_is_a_password_error() {
        let raw: RawAuthentication = serde_json::from_value(serde_json::json!({
            "email": "jane@example.com",
            "password": 12345678
        }))
        .unwrap();
        let err = Authentication::from_raw(&raw).unwrap_err();
        assert!(matches!(err, AuthenticationError::InvalidPassword(_)));
        assert!(!err.is_missing());
    }
}
