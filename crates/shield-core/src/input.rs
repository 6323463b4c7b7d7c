//! # Raw Field Input
//!
//! A borrowed view over one raw field value as it arrives from a caller.
//! Rules inspect the shape of the input; they never own or transform it.

use std::fmt;

/// One raw field value.
///
/// `Absent` models an omitted field. `Other` models a value that is present
/// but has a shape no rule understands (a nested object, a float). Both are
/// valid inputs to every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// The field was not supplied.
    Absent,
    /// A string value.
    Text(&'a str),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
    /// A list of strings.
    List(&'a [String]),
    /// A present value of an unsupported shape.
    Other,
}

impl<'a> Input<'a> {
    /// Returns true for `Absent`, empty text and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Integer(_) | Self::Boolean(_) | Self::Other => false,
        }
    }

    /// Short name of the input shape, used in type-mismatch messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::List(_) => "list",
            Self::Other => "unsupported value",
        }
    }
}

impl fmt::Display for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "list of {}", items.len()),
            other => f.write_str(other.shape()),
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<Option<&'a str>> for Input<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Absent, Self::Text)
    }
}

impl From<i64> for Input<'_> {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Input<'_> {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<'a> From<&'a [String]> for Input<'a> {
    fn from(value: &'a [String]) -> Self {
        Self::List(value)
    }
}

impl<'a> From<&'a Vec<String>> for Input<'a> {
    fn from(value: &'a Vec<String>) -> Self {
        Self::List(value.as_slice())
    }
}

impl<'a> From<Option<&'a [String]>> for Input<'a> {
    fn from(value: Option<&'a [String]>) -> Self {
        value.map_or(Self::Absent, Self::List)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shapes() {
        let none: Vec<String> = Vec::new();
        assert!(Input::Absent.is_empty());
        assert!(Input::Text("").is_empty());
        assert!(Input::from(&none).is_empty());
        assert!(!Input::Text("x").is_empty());
        assert!(!Input::Integer(0).is_empty());
        assert!(!Input::Boolean(false).is_empty());
    }

    #[test]
    fn option_conversions_map_none_to_absent() {
        assert_eq!(Input::from(None::<&str>), Input::Absent);
        assert_eq!(Input::from(None::<&[String]>), Input::Absent);
        assert_eq!(Input::from(Some("a")), Input::Text("a"));
    }

    #[test]
    fn display_quotes_text() {
        assert_eq!(Input::Text("ab").to_string(), "\"ab\"");
        assert_eq!(Input::Absent.to_string(), "absent");
    }
}
