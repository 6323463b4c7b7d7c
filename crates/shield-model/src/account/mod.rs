//! # Accounts
//!
//! Back-office accounts, login credentials, and the per-account flag bag.
//!
//! ## Validation Order
//!
//! `account_id`, `name`, `email`, `password`, `confirm_password`, `role`,
//! `is_active`. A field supplied with the wrong JSON type fails its own
//! chain, so `"account_id": 12345` is an [`AccountError::InvalidAccountId`].
//! After every field passes, the confirmation must equal the password and
//! the role code must name an [`AccountRole`].

mod authentication;
mod flags;
mod role;

pub use authentication::{Authentication, AuthenticationError, RawAuthentication};
pub use flags::{AccountFlags, AccountFlagsError, KNOWN_FLAGS};
pub use role::{AccountRole, Permission};

use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog::account as rules;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::{Export, UnknownVariant};

/// Error constructing an [`Account`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// `account_id` failed its chain.
    #[error("account identifier is not valid:\n{0}")]
    InvalidAccountId(ValidationVerdict),

    /// `name` failed its chain.
    #[error("account name is not valid:\n{0}")]
    InvalidName(ValidationVerdict),

    /// `email` failed its chain.
    #[error("account e-mail is not valid:\n{0}")]
    InvalidEmail(ValidationVerdict),

    /// `password` failed its chain.
    #[error("account password is not valid:\n{0}")]
    InvalidPassword(ValidationVerdict),

    /// `confirm_password` failed its chain.
    #[error("password confirmation is not valid:\n{0}")]
    InvalidConfirmPassword(ValidationVerdict),

    /// `role` was not supplied or is not an integer.
    #[error("account role is not valid:\n{0}")]
    InvalidRole(ValidationVerdict),

    /// `is_active` is not a boolean.
    #[error("account active flag is not valid:\n{0}")]
    InvalidIsActive(ValidationVerdict),

    /// Password and confirmation differ.
    #[error("password confirmation does not match the password")]
    ConfirmPasswordMismatch,

    /// `role` is not a known role code.
    #[error(transparent)]
    UnknownRole(#[from] UnknownVariant),
}

impl FieldError for AccountError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidAccountId(v)
            | Self::InvalidName(v)
            | Self::InvalidEmail(v)
            | Self::InvalidPassword(v)
            | Self::InvalidConfirmPassword(v)
            | Self::InvalidRole(v)
            | Self::InvalidIsActive(v) => Some(v),
            Self::ConfirmPasswordMismatch | Self::UnknownRole(_) => None,
        }
    }
}

static SCHEMA: Schema<AccountError> = Schema::new(
    "account",
    &[
        FieldSpec {
            name: "account_id",
            check: Check::Chain(&rules::ACCOUNT_ID),
            presence: Presence::Required,
            error: AccountError::InvalidAccountId,
        },
        FieldSpec {
            name: "name",
            check: Check::Chain(&rules::NAME),
            presence: Presence::Required,
            error: AccountError::InvalidName,
        },
        FieldSpec {
            name: "email",
            check: Check::Chain(&rules::EMAIL),
            presence: Presence::Required,
            error: AccountError::InvalidEmail,
        },
        FieldSpec {
            name: "password",
            check: Check::Chain(&rules::PASSWORD),
            presence: Presence::Required,
            error: AccountError::InvalidPassword,
        },
        FieldSpec {
            name: "confirm_password",
            check: Check::Chain(&rules::CONFIRM_PASSWORD),
            presence: Presence::Required,
            error: AccountError::InvalidConfirmPassword,
        },
        FieldSpec {
            name: "role",
            check: Check::Chain(&rules::ROLE),
            presence: Presence::Required,
            error: AccountError::InvalidRole,
        },
        FieldSpec {
            name: "is_active",
            check: Check::Chain(&rules::IS_ACTIVE),
            presence: Presence::IfPresent,
            error: AccountError::InvalidIsActive,
        },
    ],
);

/// Unvalidated account fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAccount {
    /// 32-character identifier.
    pub account_id: Option<RawField<String>>,
    /// Display name.
    pub name: Option<RawField<String>>,
    /// Login e-mail.
    pub email: Option<RawField<String>>,
    /// Login password.
    pub password: Option<RawField<String>>,
    /// Must equal `password`.
    pub confirm_password: Option<RawField<String>>,
    /// Integer role code.
    pub role: Option<RawField<i64>>,
    /// Defaults to `true` when omitted.
    pub is_active: Option<RawField<bool>>,
}

impl RawAccount {
    fn inputs(&self) -> [(&'static str, Input<'_>); 7] {
        [
            ("account_id", self.account_id.input()),
            ("name", self.name.input()),
            ("email", self.email.input()),
            ("password", self.password.input()),
            ("confirm_password", self.confirm_password.input()),
            ("role", self.role.input()),
            ("is_active", self.is_active.input()),
        ]
    }

    fn invariants(&self) -> Result<Account, AccountError> {
        let password = self.password.text();
        if self.confirm_password.text() != password {
            return Err(AccountError::ConfirmPasswordMismatch);
        }
        let role = AccountRole::try_from(self.role.typed().copied().unwrap_or_default())?;

        Ok(Account {
            account_id: Identifier::from_validated(self.account_id.text()),
            name: self.name.text().to_string(),
            email: self.email.text().to_string(),
            password: password.to_string(),
            role,
            is_active: self.is_active.typed().copied().unwrap_or(true),
        })
    }
}

/// A validated back-office account.
///
/// The password confirmation is checked at construction and then dropped.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    account_id: Identifier,
    name: String,
    email: String,
    password: String,
    role: AccountRole,
    is_active: bool,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("account_id", &self.account_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl Account {
    /// Validate and build an account. `role` is the integer role code.
    pub fn new(
        account_id: &str,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: i64,
        is_active: bool,
    ) -> Result<Self, AccountError> {
        Self::from_raw(&RawAccount {
            account_id: supplied(account_id),
            name: supplied(name),
            email: supplied(email),
            password: supplied(password),
            confirm_password: supplied(confirm_password),
            role: supplied(role),
            is_active: supplied(is_active),
        })
    }

    /// Build an account with the [`AccountRole::Internal`] role.
    pub fn internal(
        account_id: &str,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        is_active: bool,
    ) -> Result<Self, AccountError> {
        let role = AccountRole::Internal.code();
        Self::new(account_id, name, email, password, confirm_password, role, is_active)
    }

    /// Build an account with the [`AccountRole::Provider`] role.
    pub fn provider(
        account_id: &str,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        is_active: bool,
    ) -> Result<Self, AccountError> {
        let role = AccountRole::Provider.code();
        Self::new(account_id, name, email, password, confirm_password, role, is_active)
    }

    /// Validate raw fields, failing on the first offending one.
    ///
    /// An omitted `is_active` defaults to `true`.
    pub fn from_raw(raw: &RawAccount) -> Result<Self, AccountError> {
        SCHEMA.construct(&raw.inputs(), || raw.invariants())
    }

    /// Every error the raw fields produce, field checks first.
    ///
    /// Invariants run only when every field passes, matching the order
    /// [`Account::from_raw`] applies them in.
    pub fn audit(raw: &RawAccount) -> Vec<AccountError> {
        let errors = SCHEMA.validate_all(&raw.inputs());
        if !errors.is_empty() {
            return errors;
        }
        raw.invariants().err().into_iter().collect()
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<AccountError> {
        &SCHEMA
    }

    /// Account identifier.
    pub fn account_id(&self) -> &Identifier {
        &self.account_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Login e-mail.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Login password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Parsed role.
    pub fn role(&self) -> AccountRole {
        self.role
    }

    /// Whether the account may log in.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

impl_validating_deserialize!(Account, RawAccount, |raw| Account::from_raw(&raw));

impl Export for Account {}
