//! View schemas
//!
//! A view is declared as data: a named, ordered set of members, each with a
//! base kind, an arrayness flag, and an optional default literal. Nested
//! views and enumerations are referenced by `Arc`, so a schema is a closed
//! tree that can be shared freely across threads.
//!
//! ```rust,ignore
//! let schema = ViewSchema::builder("Config")
//!     .member(MemberDescriptor::scalar("port", MemberKind::Int).with_default(8080))
//!     .member(MemberDescriptor::array("hosts", MemberKind::String))
//!     .build()?;
//! ```

use std::fmt;
use std::sync::Arc;

use scr_sdk::PropertyValue;

use super::fixup::fixup;
use super::view::ViewValue;

/// Errors detected while declaring a view schema
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// Two members share a name
    #[error("duplicate member '{member}' in view {schema}")]
    DuplicateMember {
        /// Schema name
        schema: String,
        /// Member name
        member: String,
    },

    /// A member was declared without a name
    #[error("empty member name in view {0}")]
    EmptyMemberName(String),
}

/// Base kind of a view member
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    /// `bool`
    Boolean,
    /// `i8`
    Byte,
    /// `i16`
    Short,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// Text
    String,
    /// Type name resolved through the host's type resolver
    TypeRef,
    /// Enumeration symbol
    Enum(Arc<EnumDescriptor>),
    /// Nested view
    View(Arc<ViewSchema>),
}

impl MemberKind {
    /// Get the kind name for diagnostics
    pub fn name(&self) -> &str {
        match self {
            MemberKind::Boolean => "boolean",
            MemberKind::Byte => "byte",
            MemberKind::Short => "short",
            MemberKind::Int => "int",
            MemberKind::Long => "long",
            MemberKind::Float => "float",
            MemberKind::Double => "double",
            MemberKind::String => "string",
            MemberKind::TypeRef => "type",
            MemberKind::Enum(descriptor) => descriptor.name(),
            MemberKind::View(schema) => schema.name(),
        }
    }

    /// Zero value of a primitive kind.
    ///
    /// `None` for string, type-reference, enum and nested-view kinds: those
    /// are explicitly absent when unset.
    pub fn zero_value(&self) -> Option<ViewValue> {
        match self {
            MemberKind::Boolean => Some(ViewValue::Bool(false)),
            MemberKind::Byte => Some(ViewValue::Byte(0)),
            MemberKind::Short => Some(ViewValue::Short(0)),
            MemberKind::Int => Some(ViewValue::Int(0)),
            MemberKind::Long => Some(ViewValue::Long(0)),
            MemberKind::Float => Some(ViewValue::Float(0.0)),
            MemberKind::Double => Some(ViewValue::Double(0.0)),
            MemberKind::String | MemberKind::TypeRef | MemberKind::Enum(_) | MemberKind::View(_) => {
                None
            }
        }
    }

    /// Check if this is a nested-view kind
    pub fn is_view(&self) -> bool {
        matches!(self, MemberKind::View(_))
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared enumeration: a type name and its symbols in ordinal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    name: String,
    symbols: Vec<String>,
}

impl EnumDescriptor {
    /// Create a new enum descriptor
    pub fn new<I, S>(name: impl Into<String>, symbols: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        })
    }

    /// Get the enum type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all symbols in ordinal order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Find the ordinal of a symbol (exact match)
    pub fn ordinal(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// One declared member of a view
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    name: String,
    key: String,
    kind: MemberKind,
    is_array: bool,
    default: Option<PropertyValue>,
}

impl MemberDescriptor {
    /// Declare a single-valued member
    pub fn scalar(name: impl Into<String>, kind: MemberKind) -> Self {
        Self::new(name.into(), kind, false)
    }

    /// Declare an array member
    pub fn array(name: impl Into<String>, kind: MemberKind) -> Self {
        Self::new(name.into(), kind, true)
    }

    fn new(name: String, kind: MemberKind, is_array: bool) -> Self {
        let key = fixup(&name);
        Self {
            name,
            key,
            kind,
            is_array,
            default: None,
        }
    }

    /// Set the default literal used when the configuration has no value
    pub fn with_default(mut self, default: impl Into<PropertyValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Get the declared member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the configuration key derived from the member name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the base kind
    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    /// Check if the member is an array
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// Get the default literal, if declared
    pub fn default_value(&self) -> Option<&PropertyValue> {
        self.default.as_ref()
    }
}

/// A view schema: a name plus an ordered set of members
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSchema {
    name: String,
    members: Vec<MemberDescriptor>,
}

impl ViewSchema {
    /// Start declaring a schema
    pub fn builder(name: impl Into<String>) -> ViewSchemaBuilder {
        ViewSchemaBuilder {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Get the schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all members in declaration order
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Find a member by declared name
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Get number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the schema declares no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Builder for [`ViewSchema`]
#[derive(Debug)]
pub struct ViewSchemaBuilder {
    name: String,
    members: Vec<MemberDescriptor>,
}

impl ViewSchemaBuilder {
    /// Append a member
    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Append several members
    pub fn members(mut self, members: impl IntoIterator<Item = MemberDescriptor>) -> Self {
        self.members.extend(members);
        self
    }

    /// Validate and finish the schema
    pub fn build(self) -> Result<Arc<ViewSchema>, SchemaError> {
        for (i, member) in self.members.iter().enumerate() {
            if member.name.is_empty() {
                return Err(SchemaError::EmptyMemberName(self.name));
            }
            if self.members[..i].iter().any(|m| m.name == member.name) {
                return Err(SchemaError::DuplicateMember {
                    schema: self.name.clone(),
                    member: member.name.clone(),
                });
            }
        }

        Ok(Arc::new(ViewSchema {
            name: self.name,
            members: self.members,
        }))
    }
}
