//! Schema-driven value coercion
//!
//! Walks a [`ViewSchema`] and converts configuration values into typed
//! member values. Coercion never fails outward: every problem is reported
//! as a [`CoercionError`], logged at debug level, and replaced by the
//! member's default, its zero value, or explicit absence.
//!
//! # Lookup rules
//!
//! 1. Scalar members read `<key>`; a sequence supplies its first element.
//! 2. Array members read `<key>` as a sequence (a scalar becomes a
//!    one-element array), otherwise read `<key>.0`, `<key>.1`, ... up to
//!    the first missing index.
//! 3. Nested views read a map at `<key>`, otherwise the sub-map of keys
//!    under `<key>.0.` (or `<key>.<i>.` for array elements).

use std::borrow::Cow;
use std::ops::Bound;
use std::panic::{self, AssertUnwindSafe};

use scr_sdk::{Properties, PropertyValue, ResolveError, TypeHandle, TypeResolver};

use super::schema::{EnumDescriptor, MemberDescriptor, MemberKind, ViewSchema};
use super::view::{EnumValue, ViewInstance, ViewValue};
use crate::error::panic_message;

/// Maximum nesting depth of views (deeper members are absent)
pub const MAX_VIEW_DEPTH: usize = 64;

/// Reason a configuration value could not be coerced
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    /// Value representation is not convertible to the member kind
    #[error("cannot convert {value_type} '{value}' to {kind}")]
    Incompatible {
        /// Target kind name
        kind: String,
        /// Source value type
        value_type: &'static str,
        /// Source value text
        value: String,
    },

    /// No enum symbol has this exact name
    #[error("no symbol '{symbol}' in enum {enum_name}")]
    UnknownSymbol {
        /// Enum type name
        enum_name: String,
        /// Requested symbol
        symbol: String,
    },

    /// Type resolver reported a failure
    #[error(transparent)]
    Unresolved(#[from] ResolveError),

    /// Type resolver panicked
    #[error("type resolver panicked on {name}: {message}")]
    ResolverPanicked {
        /// Requested type name
        name: String,
        /// Panic message
        message: String,
    },

    /// Views nest deeper than [`MAX_VIEW_DEPTH`]
    #[error("view nesting exceeds {0} levels")]
    DepthExceeded(usize),
}

/// Converts configuration maps into view instances
pub(crate) struct Coercer<'a> {
    resolver: &'a dyn TypeResolver,
    nested_views: bool,
}

impl<'a> Coercer<'a> {
    pub(crate) fn new(resolver: &'a dyn TypeResolver, nested_views: bool) -> Self {
        Self {
            resolver,
            nested_views,
        }
    }

    /// Materialize a top-level view
    pub(crate) fn view(&self, schema: &ViewSchema, config: &Properties) -> ViewInstance {
        self.view_at(schema, config, 0)
    }

    fn view_at(&self, schema: &ViewSchema, config: &Properties, depth: usize) -> ViewInstance {
        let members = schema
            .members()
            .iter()
            .map(|member| (member.name().to_string(), self.member(member, config, depth)))
            .collect();
        ViewInstance::new(schema.name(), members)
    }

    fn member(&self, member: &MemberDescriptor, config: &Properties, depth: usize) -> Option<ViewValue> {
        if member.kind().is_view() && !self.nested_views {
            return None;
        }

        if member.is_array() {
            self.array_member(member, config, depth)
        } else {
            self.scalar_member(member, config, depth)
        }
    }

    // ========================================================================
    // Scalar members
    // ========================================================================

    fn scalar_member(
        &self,
        member: &MemberDescriptor,
        config: &Properties,
        depth: usize,
    ) -> Option<ViewValue> {
        let kind = member.kind();
        if let MemberKind::View(schema) = kind {
            return self.nested_view(schema, member.key(), config, depth);
        }

        for source in [config.get(member.key()), member.default_value()] {
            if let Some(value) = first_value(source) {
                match self.coerce(kind, value) {
                    Ok(coerced) => return Some(coerced),
                    Err(e) => tracing::debug!(
                        member = member.name(),
                        key = member.key(),
                        error = %e,
                        "coercion failed, falling back"
                    ),
                }
            }
        }

        kind.zero_value()
    }

    fn nested_view(
        &self,
        schema: &ViewSchema,
        key: &str,
        config: &Properties,
        depth: usize,
    ) -> Option<ViewValue> {
        let direct = match config.get(key) {
            Some(PropertyValue::Map(map)) => Some(map),
            Some(PropertyValue::Array(items)) => items.first().and_then(PropertyValue::as_map),
            _ => None,
        };

        let sub = match direct {
            Some(map) => Cow::Borrowed(map),
            None => {
                let prefixed = sub_map(config, &format!("{}.0.", key));
                if prefixed.is_empty() {
                    return None;
                }
                Cow::Owned(prefixed)
            }
        };

        match self.view_element(schema, &sub, depth) {
            ViewValue::Null => None,
            view => Some(view),
        }
    }

    // ========================================================================
    // Array members
    // ========================================================================

    fn array_member(
        &self,
        member: &MemberDescriptor,
        config: &Properties,
        depth: usize,
    ) -> Option<ViewValue> {
        let elements = match config.get(member.key()) {
            Some(value) => Some(self.elements(member, value, depth)),
            None => self.indexed_elements(member, config, depth),
        };

        elements
            .or_else(|| {
                member
                    .default_value()
                    .map(|default| self.elements(member, default, depth))
            })
            .map(ViewValue::Array)
    }

    fn elements(&self, member: &MemberDescriptor, value: &PropertyValue, depth: usize) -> Vec<ViewValue> {
        match value {
            PropertyValue::Array(items) => items
                .iter()
                .map(|item| self.element(member, item, depth))
                .collect(),
            single => vec![self.element(member, single, depth)],
        }
    }

    /// Collect `<key>.0`, `<key>.1`, ... until the first missing index
    fn indexed_elements(&self, member: &MemberDescriptor, config: &Properties, depth: usize) -> Option<Vec<ViewValue>> {
        let mut elements = Vec::new();
        let mut index = 0usize;

        loop {
            let indexed = format!("{}.{}", member.key(), index);
            match member.kind() {
                MemberKind::View(schema) => {
                    let sub = match config.get(&indexed) {
                        Some(PropertyValue::Map(map)) => Cow::Borrowed(map),
                        _ => {
                            let prefixed = sub_map(config, &format!("{}.", indexed));
                            if prefixed.is_empty() {
                                break;
                            }
                            Cow::Owned(prefixed)
                        }
                    };
                    elements.push(self.view_element(schema, &sub, depth));
                }
                _ => match config.get(&indexed) {
                    Some(value) => elements.push(self.element(member, value, depth)),
                    None => break,
                },
            }
            index += 1;
        }

        if elements.is_empty() {
            None
        } else {
            Some(elements)
        }
    }

    fn element(&self, member: &MemberDescriptor, value: &PropertyValue, depth: usize) -> ViewValue {
        match member.kind() {
            MemberKind::View(schema) => {
                let empty = Properties::new();
                let map = value.as_map().unwrap_or(&empty);
                self.view_element(schema, map, depth)
            }
            kind => self.coerce(kind, value).unwrap_or_else(|e| {
                tracing::debug!(
                    member = member.name(),
                    key = member.key(),
                    error = %e,
                    "array element coercion failed"
                );
                kind.zero_value().unwrap_or(ViewValue::Null)
            }),
        }
    }

    fn view_element(&self, schema: &ViewSchema, config: &Properties, depth: usize) -> ViewValue {
        if depth >= MAX_VIEW_DEPTH {
            tracing::debug!(
                view = schema.name(),
                error = %CoercionError::DepthExceeded(MAX_VIEW_DEPTH),
                "nested view dropped"
            );
            return ViewValue::Null;
        }
        ViewValue::View(self.view_at(schema, config, depth + 1))
    }

    // ========================================================================
    // Scalar coercion
    // ========================================================================

    /// Coerce a single non-sequence value to a non-view kind
    fn coerce(&self, kind: &MemberKind, value: &PropertyValue) -> Result<ViewValue, CoercionError> {
        if matches!(value, PropertyValue::Array(_) | PropertyValue::Map(_)) {
            return Err(incompatible(kind, value));
        }

        let coerced = match kind {
            MemberKind::Boolean => to_bool(value).map(ViewValue::Bool),
            MemberKind::Byte => to_narrow(value, |v| v as i8).map(ViewValue::Byte),
            MemberKind::Short => to_narrow(value, |v| v as i16).map(ViewValue::Short),
            MemberKind::Int => to_narrow(value, |v| v as i32).map(ViewValue::Int),
            MemberKind::Long => to_i64(value).map(ViewValue::Long),
            MemberKind::Float => to_f64(value).map(|v| ViewValue::Float(v as f32)),
            MemberKind::Double => to_f64(value).map(ViewValue::Double),
            MemberKind::String => Some(ViewValue::String(value.to_string())),
            MemberKind::TypeRef => return self.resolve_type(&value.to_string()).map(ViewValue::Type),
            MemberKind::Enum(descriptor) => return enum_constant(descriptor, value).map(ViewValue::Enum),
            MemberKind::View(_) => None,
        };

        coerced.ok_or_else(|| incompatible(kind, value))
    }

    fn resolve_type(&self, name: &str) -> Result<TypeHandle, CoercionError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.resolver.resolve(name))) {
            Ok(result) => result.map_err(CoercionError::from),
            Err(payload) => Err(CoercionError::ResolverPanicked {
                name: name.to_string(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// A sequence stands for its first element; an empty one for no value
fn first_value(value: Option<&PropertyValue>) -> Option<&PropertyValue> {
    match value? {
        PropertyValue::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Keys under `prefix`, with the prefix stripped
fn sub_map(config: &Properties, prefix: &str) -> Properties {
    config
        .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, value)| (key[prefix.len()..].to_string(), value.clone()))
        .collect()
}

fn incompatible(kind: &MemberKind, value: &PropertyValue) -> CoercionError {
    CoercionError::Incompatible {
        kind: kind.name().to_string(),
        value_type: value.type_name(),
        value: value.to_string(),
    }
}

fn to_bool(value: &PropertyValue) -> Option<bool> {
    match value {
        PropertyValue::Bool(b) => Some(*b),
        PropertyValue::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            other => parse_f64(other).map(|v| v != 0.0),
        },
        other => other.as_f64().map(|v| v != 0.0),
    }
}

fn to_i64(value: &PropertyValue) -> Option<i64> {
    match value {
        PropertyValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                parse_f64(s)
                    .filter(|v| *v >= i64::MIN as f64 && *v < i64::MAX as f64)
                    .map(|v| v as i64)
            })
        }
        other => other.as_i64(),
    }
}

/// Integer of a narrow kind.
///
/// Text must fit the target range; numeric values are narrowed with `narrow`.
fn to_narrow<T: TryFrom<i64>>(value: &PropertyValue, narrow: fn(i64) -> T) -> Option<T> {
    let wide = to_i64(value)?;
    match value {
        PropertyValue::String(_) => T::try_from(wide).ok(),
        _ => Some(narrow(wide)),
    }
}

fn to_f64(value: &PropertyValue) -> Option<f64> {
    match value {
        PropertyValue::String(s) => parse_f64(s),
        other => other.as_f64(),
    }
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn enum_constant(descriptor: &EnumDescriptor, value: &PropertyValue) -> Result<EnumValue, CoercionError> {
    let symbol = value.to_string();
    match descriptor.ordinal(&symbol) {
        Some(ordinal) => Ok(EnumValue {
            type_name: descriptor.name().to_string(),
            symbol,
            ordinal,
        }),
        None => Err(CoercionError::UnknownSymbol {
            enum_name: descriptor.name().to_string(),
            symbol,
        }),
    }
}
