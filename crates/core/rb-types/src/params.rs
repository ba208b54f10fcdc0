//! Typed configuration parameters.
//!
//! Transforms declare their parameters as [`ParamSpec`]s; the launcher turns
//! those into a CLI surface and hands the captured values back as a
//! [`ParamMap`] for validation. Values are typed so domain checks happen at
//! construction, not at first use.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer parameter (counts, limits)
    Int(i64),

    /// Floating-point parameter (sizes in megabytes)
    Float(f64),

    /// String parameter (enums, paths)
    Str(String),

    /// Boolean flag
    Bool(bool),
}

impl ParamValue {
    /// Returns the integer value, if this is an integer parameter.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers coerce losslessly.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string parameter.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Captured parameter values, keyed by parameter name.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Declaration of one recognized parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as it appears on the CLI surface
    pub name: String,

    /// Default value when the parameter is not supplied
    pub default: ParamValue,

    /// Help text for the CLI surface
    pub help: String,

    /// Allowed values, for enum-like string parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,

    /// Sensitive parameters are elided from persisted run metadata
    #[serde(default)]
    pub sensitive: bool,
}

impl ParamSpec {
    /// Creates a parameter spec.
    pub fn new(name: impl Into<String>, default: impl Into<ParamValue>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            help: help.into(),
            allowed: None,
            sensitive: false,
        }
    }

    /// Restricts the parameter to an enumerated set of values.
    pub fn with_allowed(mut self, allowed: &[&str]) -> Self {
        self.allowed = Some(allowed.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Marks the parameter as sensitive (stripped from run metadata).
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_coerces_to_float() {
        assert_eq!(ParamValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ParamValue::Float(2.5).as_float(), Some(2.5));
        assert_eq!(ParamValue::Str("3".into()).as_float(), None);
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(ParamValue::Int(-1).as_int(), Some(-1));
        assert_eq!(ParamValue::Float(1.5).as_int(), None);
        assert_eq!(ParamValue::Str("disk".into()).as_str(), Some("disk"));
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn test_spec_builder() {
        let spec = ParamSpec::new("size_type", "disk", "How size is measured")
            .with_allowed(&["disk", "memory"]);
        assert_eq!(spec.default, ParamValue::Str("disk".into()));
        assert_eq!(spec.allowed.as_deref(), Some(&["disk".to_string(), "memory".to_string()][..]));
        assert!(!spec.sensitive);
    }

    #[test]
    fn test_param_value_serde() {
        let map: ParamMap = [
            ("max_rows_per_table".to_string(), ParamValue::Int(1000)),
            ("size_type".to_string(), ParamValue::Str("disk".into())),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&map).unwrap();
        let parsed: ParamMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }
}
