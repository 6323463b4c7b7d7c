//! # Attribute Export
//!
//! Validated records leave this crate as plain attribute mappings for the
//! storage layer. Export is a straight serde projection: values are written
//! exactly as validated, enums in their wire form, and absent optional
//! fields are left out.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ModelError;

/// Projection of a validated record onto an attribute mapping.
pub trait Export: Serialize {
    /// The record's attributes, without absent optionals.
    fn attributes(&self) -> Result<Map<String, Value>, ModelError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ModelError::Serialization(serde::ser::Error::custom(format!(
                "record exported as {other} instead of an object"
            )))),
        }
    }
}
