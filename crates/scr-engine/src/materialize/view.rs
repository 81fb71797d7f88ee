//! Materialized view instances
//!
//! A [`ViewInstance`] is the immutable output of materialization: one slot
//! per declared member, in declaration order, each holding either a coerced
//! value or the explicit absence marker (`None`). Lookups distinguish a
//! member that is absent from a name the schema never declared.

use std::fmt;

use scr_sdk::TypeHandle;

/// Resolved enum constant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Declaring enum type name
    pub type_name: String,
    /// Symbol name
    pub symbol: String,
    /// Position of the symbol in its declaration
    pub ordinal: usize,
}

/// A coerced member value
#[derive(Debug, Clone, PartialEq)]
pub enum ViewValue {
    /// Boolean
    Bool(bool),
    /// 8-bit integer
    Byte(i8),
    /// 16-bit integer
    Short(i16),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Text
    String(String),
    /// Resolved type reference
    Type(TypeHandle),
    /// Enum constant
    Enum(EnumValue),
    /// Nested view
    View(ViewInstance),
    /// Array of element values
    Array(Vec<ViewValue>),
    /// Array element that could not be coerced
    Null,
}

impl ViewValue {
    /// Get type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ViewValue::Bool(_) => "boolean",
            ViewValue::Byte(_) => "byte",
            ViewValue::Short(_) => "short",
            ViewValue::Int(_) => "int",
            ViewValue::Long(_) => "long",
            ViewValue::Float(_) => "float",
            ViewValue::Double(_) => "double",
            ViewValue::String(_) => "string",
            ViewValue::Type(_) => "type",
            ViewValue::Enum(_) => "enum",
            ViewValue::View(_) => "view",
            ViewValue::Array(_) => "array",
            ViewValue::Null => "null",
        }
    }

    /// Extract a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ViewValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Widen any integer value to i64
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ViewValue::Byte(v) => Some(v as i64),
            ViewValue::Short(v) => Some(v as i64),
            ViewValue::Int(v) => Some(v as i64),
            ViewValue::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Widen any floating value to f64
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ViewValue::Float(v) => Some(v as f64),
            ViewValue::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ViewValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow a resolved type
    pub fn as_type(&self) -> Option<&TypeHandle> {
        match self {
            ViewValue::Type(t) => Some(t),
            _ => None,
        }
    }

    /// Borrow an enum constant
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            ViewValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow a nested view
    pub fn as_view(&self) -> Option<&ViewInstance> {
        match self {
            ViewValue::View(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow array elements
    pub fn as_array(&self) -> Option<&[ViewValue]> {
        match self {
            ViewValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Check for the null element marker
    pub fn is_null(&self) -> bool {
        matches!(self, ViewValue::Null)
    }
}

impl fmt::Display for ViewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewValue::Bool(v) => write!(f, "{}", v),
            ViewValue::Byte(v) => write!(f, "{}", v),
            ViewValue::Short(v) => write!(f, "{}", v),
            ViewValue::Int(v) => write!(f, "{}", v),
            ViewValue::Long(v) => write!(f, "{}", v),
            ViewValue::Float(v) => write!(f, "{}", v),
            ViewValue::Double(v) => write!(f, "{}", v),
            ViewValue::String(v) => f.write_str(v),
            ViewValue::Type(t) => write!(f, "{}", t),
            ViewValue::Enum(e) => f.write_str(&e.symbol),
            ViewValue::View(v) => write!(f, "{}", v),
            ViewValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ViewValue::Null => f.write_str("null"),
        }
    }
}

/// Result of looking up a member by name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The member has a value
    Value(&'a ViewValue),
    /// The member is declared but explicitly absent
    Absent,
    /// The schema declares no member with this name
    Unknown,
}

impl<'a> Lookup<'a> {
    /// Get the value, treating absence and unknown names alike
    pub fn value(self) -> Option<&'a ViewValue> {
        match self {
            Lookup::Value(v) => Some(v),
            Lookup::Absent | Lookup::Unknown => None,
        }
    }

    /// Check if the member is declared but absent
    pub fn is_absent(self) -> bool {
        matches!(self, Lookup::Absent)
    }
}

/// Immutable record produced by materializing a view schema
#[derive(Debug, Clone, PartialEq)]
pub struct ViewInstance {
    schema_name: String,
    members: Vec<(String, Option<ViewValue>)>,
}

impl ViewInstance {
    pub(crate) fn new(schema_name: impl Into<String>, members: Vec<(String, Option<ViewValue>)>) -> Self {
        Self {
            schema_name: schema_name.into(),
            members,
        }
    }

    /// Get the name of the schema this view was built from
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Look up a member by declared name
    pub fn lookup(&self, member: &str) -> Lookup<'_> {
        match self.members.iter().find(|(name, _)| name == member) {
            Some((_, Some(value))) => Lookup::Value(value),
            Some((_, None)) => Lookup::Absent,
            None => Lookup::Unknown,
        }
    }

    /// Get a member value (`None` when absent or undeclared)
    pub fn get(&self, member: &str) -> Option<&ViewValue> {
        self.lookup(member).value()
    }

    /// Check if the schema declares a member
    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|(name, _)| name == member)
    }

    /// Iterate over members in declaration order
    pub fn members(&self) -> impl Iterator<Item = (&str, Option<&ViewValue>)> {
        self.members
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Get a boolean member
    pub fn get_bool(&self, member: &str) -> Option<bool> {
        self.get(member).and_then(ViewValue::as_bool)
    }

    /// Get any integer member widened to i64
    pub fn get_i64(&self, member: &str) -> Option<i64> {
        self.get(member).and_then(ViewValue::as_i64)
    }

    /// Get any floating member widened to f64
    pub fn get_f64(&self, member: &str) -> Option<f64> {
        self.get(member).and_then(ViewValue::as_f64)
    }

    /// Get a string member
    pub fn get_str(&self, member: &str) -> Option<&str> {
        self.get(member).and_then(ViewValue::as_str)
    }

    /// Get a nested view member
    pub fn get_view(&self, member: &str) -> Option<&ViewInstance> {
        self.get(member).and_then(ViewValue::as_view)
    }

    /// Get an array member's elements
    pub fn get_array(&self, member: &str) -> Option<&[ViewValue]> {
        self.get(member).and_then(ViewValue::as_array)
    }
}

impl fmt::Display for ViewInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.schema_name)?;
        for (i, (name, value)) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{}={}", name, v)?,
                None => write!(f, "{}=<absent>", name)?,
            }
        }
        f.write_str("}")
    }
}
