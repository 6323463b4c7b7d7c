//! # Raw Payload Fields
//!
//! Every `Raw*` payload struct holds its fields as `Option<RawField<T>>`.
//! A value of the expected JSON type lands in [`RawField::Typed`]; any other
//! value is kept in [`RawField::Mistyped`] instead of failing the payload.
//! The field's chain then sees the value's real shape through
//! [`RawSlot::input`] and rejects it with the field's own error.

use serde::Deserialize;
use serde_json::Value;
use shield_core::Input;

/// One supplied payload field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField<T> {
    /// A value of the expected type.
    Typed(T),
    /// A value of any other JSON type.
    Mistyped(Value),
}

impl<T: AsInput> RawField<T> {
    /// Rule input for this value.
    pub fn input(&self) -> Input<'_> {
        match self {
            Self::Typed(value) => value.as_input(),
            Self::Mistyped(value) => value_input(value),
        }
    }

    /// The value, when it has the expected type.
    pub fn typed(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Mistyped(_) => None,
        }
    }
}

impl<T> From<T> for RawField<T> {
    fn from(value: T) -> Self {
        Self::Typed(value)
    }
}

impl From<&str> for RawField<String> {
    fn from(value: &str) -> Self {
        Self::Typed(value.to_string())
    }
}

impl From<&[&str]> for RawField<Vec<String>> {
    fn from(values: &[&str]) -> Self {
        Self::Typed(values.iter().map(|s| s.to_string()).collect())
    }
}

/// Types a rule can inspect directly.
pub trait AsInput {
    /// Borrow the value as rule input.
    fn as_input(&self) -> Input<'_>;
}

impl AsInput for String {
    fn as_input(&self) -> Input<'_> {
        Input::Text(self)
    }
}

impl AsInput for Vec<String> {
    fn as_input(&self) -> Input<'_> {
        Input::List(self)
    }
}

impl AsInput for i64 {
    fn as_input(&self) -> Input<'_> {
        Input::Integer(*self)
    }
}

impl AsInput for bool {
    fn as_input(&self) -> Input<'_> {
        Input::Boolean(*self)
    }
}

fn value_input(value: &Value) -> Input<'_> {
    match value {
        Value::Null => Input::Absent,
        Value::String(s) => Input::Text(s),
        Value::Bool(b) => Input::Boolean(*b),
        Value::Number(n) => n.as_i64().map_or(Input::Other, Input::Integer),
        Value::Array(_) | Value::Object(_) => Input::Other,
    }
}

/// Access to an optional payload field.
pub trait RawSlot {
    /// Expected type of the field.
    type Value;

    /// Rule input; an omitted field is [`Input::Absent`].
    fn input(&self) -> Input<'_>;

    /// The value, when supplied with the expected type.
    fn typed(&self) -> Option<&Self::Value>;
}

impl<T: AsInput> RawSlot for Option<RawField<T>> {
    type Value = T;

    fn input(&self) -> Input<'_> {
        self.as_ref().map_or(Input::Absent, RawField::input)
    }

    fn typed(&self) -> Option<&T> {
        self.as_ref().and_then(RawField::typed)
    }
}

/// Text views of an optional string field.
pub trait RawText {
    /// The string, or `""` when omitted or mistyped.
    fn text(&self) -> &str;

    /// The string when supplied and non-empty.
    fn non_empty(&self) -> Option<String>;

    /// The string, or the JSON text of a mistyped value.
    fn rendered(&self) -> String;
}

impl RawText for Option<RawField<String>> {
    fn text(&self) -> &str {
        self.typed().map_or("", String::as_str)
    }

    fn non_empty(&self) -> Option<String> {
        self.typed().filter(|s| !s.is_empty()).cloned()
    }

    fn rendered(&self) -> String {
        match self {
            Some(RawField::Mistyped(value)) => value.to_string(),
            _ => self.text().to_string(),
        }
    }
}

/// Wrap a constructor argument as a supplied field.
pub(crate) fn supplied<T, V: Into<RawField<T>>>(value: V) -> Option<RawField<T>> {
    Some(value.into())
}
