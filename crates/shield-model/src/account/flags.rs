use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::Export;

/// Flag keys an account may carry.
pub const KNOWN_FLAGS: &[&str] = &["change_password"];

/// Error building [`AccountFlags`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountFlagsError {
    /// A key outside [`KNOWN_FLAGS`].
    #[error("unknown account flag: {0:?}")]
    UnknownFlag(String),

    /// A known flag whose value is not a boolean.
    #[error("account flag {flag:?} must be a boolean, got {found}")]
    NonBoolean {
        /// The flag key.
        flag: String,
        /// JSON type of the rejected value.
        found: &'static str,
    },
}

/// Per-account switches. Each instance owns its own values; an omitted
/// flag is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccountFlags {
    change_password: bool,
}

impl AccountFlags {
    /// Validate a flag mapping.
    ///
    /// Every key is checked against [`KNOWN_FLAGS`] before any value is
    /// inspected, so an unknown key wins over a bad value.
    pub fn new(flags: &Map<String, Value>) -> Result<Self, AccountFlagsError> {
        if let Some(unknown) = flags.keys().find(|k| !KNOWN_FLAGS.contains(&k.as_str())) {
            tracing::debug!(flag = %unknown, "account flag rejected");
            return Err(AccountFlagsError::UnknownFlag(unknown.clone()));
        }

        Ok(Self {
            change_password: flag(flags, "change_password")?,
        })
    }

    /// Whether the user must change password at next login.
    pub fn change_password(&self) -> bool {
        self.change_password
    }
}

fn flag(flags: &Map<String, Value>, key: &str) -> Result<bool, AccountFlagsError> {
    match flags.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(AccountFlagsError::NonBoolean {
            flag: key.to_string(),
            found: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<'de> Deserialize<'de> for AccountFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

impl Export for AccountFlags {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn boolean_flag_accepted() {
        let flags = AccountFlags::new(&map(json!({ "change_password": true }))).unwrap();
        assert!(flags.change_password());
    }

    #[test]
    fn non_boolean_rejected() {
        let err = AccountFlags::new(&map(json!({ "change_password": "yes" }))).unwrap_err();
        assert_eq!(
            err,
            AccountFlagsError::NonBoolean {
                flag: "change_password".into(),
                found: "string"
            }
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let err = AccountFlags::new(&map(json!({ "unknown_flag": true }))).unwrap_err();
        assert_eq!(err, AccountFlagsError::UnknownFlag("unknown_flag".into()));
    }

    #[test]
    fn unknown_key_wins_over_bad_value() {
        let err =
            AccountFlags::new(&map(json!({ "change_password": 1, "other": false }))).unwrap_err();
        assert_eq!(err, AccountFlagsError::UnknownFlag("other".into()));
    }

    #[test]
    fn omitted_flag_defaults_to_false() {
        let flags = AccountFlags::new(&Map::new()).unwrap();
        assert_eq!(flags, AccountFlags::default());
        assert!(!flags.change_password());
    }

    #[test]
    fn instances_do_not_share_state() {
        let on = AccountFlags::new(&map(json!({ "change_password": true }))).unwrap();
        let off = AccountFlags::new(&Map::new()).unwrap();
        assert!(on.change_password());
        assert!(!off.change_password());
    }

    #[test]
    fn export_and_deserialize() {
        let flags: AccountFlags = serde_json::from_value(json!({ "change_password": true })).unwrap();
        assert_eq!(flags.attributes().unwrap()["change_password"], true);
        assert!(serde_json::from_value::<AccountFlags>(json!({ "x": true })).is_err());
    }
}
