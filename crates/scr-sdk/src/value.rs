//! Untyped configuration values
//!
//! Component configuration reaches the binding layer as a flat
//! name → value map. A value is a scalar, a homogeneous sequence, or a
//! nested map. Array and nested-view members may additionally be spread
//! over dotted-index keys (`key.0`, `key.1.member`); that convention is
//! interpreted by the materialization engine, not here.
//!
//! # Serialization
//!
//! `PropertyValue` is `#[serde(untagged)]`. Deserializing picks the widest
//! representation (`Long`, `Double`), so the narrow integer and `Float`
//! variants only appear when a host constructs them directly.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration map handed to callbacks and to view materialization.
///
/// Ordered so that identical inputs always iterate identically.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Long(i64),
    /// 64-bit float
    Double(f64),
    /// String
    String(String),
    /// Homogeneous ordered sequence
    Array(Vec<PropertyValue>),
    /// Nested map (a pre-shaped nested view)
    Map(Properties),
    /// 8-bit integer
    Byte(i8),
    /// 16-bit integer
    Short(i16),
    /// 32-bit integer
    Int(i32),
    /// 32-bit float
    Float(f32),
}

impl PropertyValue {
    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Long(_) => "long",
            PropertyValue::Double(_) => "double",
            PropertyValue::String(_) => "string",
            PropertyValue::Array(_) => "array",
            PropertyValue::Map(_) => "map",
            PropertyValue::Byte(_) => "byte",
            PropertyValue::Short(_) => "short",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
        }
    }

    /// Check if the value is sequence-shaped
    pub const fn is_sequence(&self) -> bool {
        matches!(self, PropertyValue::Array(_))
    }

    /// Check if the value is a number of any width
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            PropertyValue::Long(_)
                | PropertyValue::Double(_)
                | PropertyValue::Byte(_)
                | PropertyValue::Short(_)
                | PropertyValue::Int(_)
                | PropertyValue::Float(_)
        )
    }

    /// Borrow the elements of a sequence
    pub fn as_sequence(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow a nested map
    pub fn as_map(&self) -> Option<&Properties> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract a boolean value
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert any numeric value to i64.
    ///
    /// Floats truncate toward zero and saturate at the i64 bounds.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            PropertyValue::Long(v) => Some(v),
            PropertyValue::Int(v) => Some(v as i64),
            PropertyValue::Short(v) => Some(v as i64),
            PropertyValue::Byte(v) => Some(v as i64),
            PropertyValue::Double(v) => Some(v as i64),
            PropertyValue::Float(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Convert any numeric value to f64
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            PropertyValue::Double(v) => Some(v),
            PropertyValue::Float(v) => Some(v as f64),
            PropertyValue::Long(v) => Some(v as f64),
            PropertyValue::Int(v) => Some(v as f64),
            PropertyValue::Short(v) => Some(v as f64),
            PropertyValue::Byte(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Long(v) => write!(f, "{}", v),
            PropertyValue::Double(v) => write!(f, "{}", v),
            PropertyValue::String(v) => f.write_str(v),
            PropertyValue::Byte(v) => write!(f, "{}", v),
            PropertyValue::Short(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            PropertyValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(v: $ty) -> Self {
                    PropertyValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Properties => Map,
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::Array(items.into_iter().map(Into::into).collect())
    }
}
