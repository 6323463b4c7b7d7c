//! # Roles and Permissions
//!
//! Integer-coded closed sets. The integers are the wire form: they are what
//! callers submit and what [`Export`](crate::Export) writes back.

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Role of a back-office account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i64)]
pub enum AccountRole {
    /// Read-only visitor.
    Guest = 100,
    /// Operator of the authority itself.
    Internal = 200,
    /// Rights holder that reports infringing targets.
    Reporter = 300,
    /// Network provider that executes blocks.
    Provider = 400,
}

impl AccountRole {
    /// Every role in ascending code order.
    pub fn all() -> &'static [AccountRole] {
        &[Self::Guest, Self::Internal, Self::Reporter, Self::Provider]
    }

    /// Integer wire code.
    pub const fn code(&self) -> i64 {
        *self as i64
    }

    /// Upper-case role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::Internal => "INTERNAL",
            Self::Reporter => "REPORTER",
            Self::Provider => "PROVIDER",
        }
    }
}

impl TryFrom<i64> for AccountRole {
    type Error = UnknownVariant;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.code() == code)
            .ok_or_else(|| UnknownVariant::new("account role", code))
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AccountRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for AccountRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i64::deserialize(deserializer)?;
        Self::try_from(code).map_err(serde::de::Error::custom)
    }
}

/// A grantable capability, grouped by hundreds per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i64)]
pub enum Permission {
    /// Create accounts.
    CreateAccount = 101,
    /// View accounts.
    ViewAccount = 102,
    /// Edit accounts.
    EditAccount = 103,
    /// Delete accounts.
    DeleteAccount = 104,

    /// Create tickets.
    CreateTicket = 201,
    /// View tickets.
    ViewTicket = 202,
    /// Edit tickets.
    EditTicket = 203,
    /// Delete tickets.
    DeleteTicket = 204,
    /// Upload ticket attachments.
    UploadTicket = 205,

    /// Create whitelist items.
    CreateWhitelistItem = 301,
    /// View whitelist items.
    ViewWhitelistItem = 302,
    /// Edit whitelist items.
    EditWhitelistItem = 303,
    /// Delete whitelist items.
    DeleteWhitelistItem = 304,

    /// Create DDAs.
    CreateDda = 401,
    /// View DDAs.
    ViewDda = 402,
    /// Edit DDAs.
    EditDda = 403,
    /// Delete DDAs.
    DeleteDda = 404,
}

impl Permission {
    /// Every permission in ascending code order.
    pub fn all() -> &'static [Permission] {
        &[
            Self::CreateAccount,
            Self::ViewAccount,
            Self::EditAccount,
            Self::DeleteAccount,
            Self::CreateTicket,
            Self::ViewTicket,
            Self::EditTicket,
            Self::DeleteTicket,
            Self::UploadTicket,
            Self::CreateWhitelistItem,
            Self::ViewWhitelistItem,
            Self::EditWhitelistItem,
            Self::DeleteWhitelistItem,
            Self::CreateDda,
            Self::ViewDda,
            Self::EditDda,
            Self::DeleteDda,
        ]
    }

    /// Integer wire code.
    pub const fn code(&self) -> i64 {
        *self as i64
    }

    /// Resource group (the hundreds digit): 1 accounts, 2 tickets,
    /// 3 whitelist, 4 DDAs.
    pub const fn group(&self) -> i64 {
        self.code() / 100
    }
}

impl TryFrom<i64> for Permission {
    type Error = UnknownVariant;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.code() == code)
            .ok_or_else(|| UnknownVariant::new("permission", code))
    }
}

impl Serialize for Permission {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i64::deserialize(deserializer)?;
        Self::try_from(code).map_err(serde::de::Error::custom)
    }
}
