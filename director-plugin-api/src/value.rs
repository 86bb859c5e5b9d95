//! Property payloads and their declared types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of an observable property.
///
/// Every assignment is checked against it, see [`PropertyValue::is_assignable_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    String,
    Bool,
    Int,
    Double,
    /// Arbitrary structured data (maps, arrays, nested values)
    Object,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Bool => "bool",
            PropertyType::Int => "int",
            PropertyType::Double => "double",
            PropertyType::Object => "object",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payload held by an observable property.
///
/// Serializes untagged, so config files and JSON payloads carry plain
/// scalars rather than `{ "Bool": true }` wrappers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Object(serde_json::Value),
}

impl PropertyValue {
    /// Short name of the payload kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Double(_) => "double",
            PropertyValue::String(_) => "string",
            PropertyValue::Object(_) => "object",
        }
    }

    /// Whether this value may be stored in a property declared as `ty`.
    ///
    /// `Null` is only accepted by the reference-like types (`String`, `Object`).
    pub fn is_assignable_to(&self, ty: PropertyType) -> bool {
        matches!(
            (self, ty),
            (PropertyValue::Null, PropertyType::String | PropertyType::Object)
                | (PropertyValue::Bool(_), PropertyType::Bool)
                | (PropertyValue::Int(_), PropertyType::Int)
                | (PropertyValue::Double(_), PropertyType::Double)
                | (PropertyValue::String(_), PropertyType::String)
                | (PropertyValue::Object(_), PropertyType::Object)
        )
    }

    /// The natural declared type for this value (`Null` maps to `String`).
    pub fn natural_type(&self) -> PropertyType {
        match self {
            PropertyValue::Null | PropertyValue::String(_) => PropertyType::String,
            PropertyValue::Bool(_) => PropertyType::Bool,
            PropertyValue::Int(_) => PropertyType::Int,
            PropertyValue::Double(_) => PropertyType::Double,
            PropertyValue::Object(_) => PropertyType::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Value> {
        match self {
            PropertyValue::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to a TOML value for persistence. TOML has no null, so `Null`
    /// yields `None`.
    pub fn to_toml(&self) -> Result<Option<toml::Value>, toml::ser::Error> {
        let value = match self {
            PropertyValue::Null => return Ok(None),
            PropertyValue::Bool(b) => toml::Value::Boolean(*b),
            PropertyValue::Int(i) => toml::Value::Integer(*i),
            PropertyValue::Double(d) => toml::Value::Float(*d),
            PropertyValue::String(s) => toml::Value::String(s.clone()),
            PropertyValue::Object(v) => toml::Value::try_from(v)?,
        };
        Ok(Some(value))
    }

    /// Read a persisted TOML value back, shaped by the property's declared type.
    ///
    /// Integers widen to `Double` for double properties, and every value read
    /// for an object property is kept as JSON, scalars included. Anything that
    /// does not fit the declared type is returned in its natural form so the
    /// property's own type check reports the mismatch.
    pub fn from_toml(value: toml::Value, ty: PropertyType) -> Self {
        match (value, ty) {
            (toml::Value::Datetime(dt), _) => PropertyValue::String(dt.to_string()),
            (other, PropertyType::Object) => match serde_json::to_value(&other) {
                Ok(json) => PropertyValue::Object(json),
                Err(_) => PropertyValue::String(other.to_string()),
            },
            (toml::Value::Integer(i), PropertyType::Double) => PropertyValue::Double(i as f64),
            (toml::Value::Boolean(b), _) => PropertyValue::Bool(b),
            (toml::Value::Integer(i), _) => PropertyValue::Int(i),
            (toml::Value::Float(d), _) => PropertyValue::Double(d),
            (toml::Value::String(s), _) => PropertyValue::String(s),
            (other, _) => match serde_json::to_value(&other) {
                Ok(json) => PropertyValue::Object(json),
                Err(_) => PropertyValue::String(other.to_string()),
            },
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::Null, PropertyValue::Null) => true,
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            (PropertyValue::Int(a), PropertyValue::Int(b)) => a == b,
            // NaN equals NaN so a NaN-valued property settles instead of
            // notifying on every write
            (PropertyValue::Double(a), PropertyValue::Double(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (PropertyValue::String(a), PropertyValue::String(b)) => a == b,
            (PropertyValue::Object(a), PropertyValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Double(d) => write!(f, "{d}"),
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Object(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        PropertyValue::Object(value)
    }
}
