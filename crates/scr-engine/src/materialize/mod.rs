//! View materialization
//!
//! Turns an untyped configuration map into a typed [`ViewInstance`] by
//! interpreting a [`ViewSchema`]. No code generation is involved: the
//! schema is plain data and the result is a name-addressable value table.
//!
//! Materialization is a pure function of its inputs. It never fails;
//! values that can't be coerced fall back to the member's default, its
//! zero value, or explicit absence.

pub mod coerce;
pub mod fixup;
pub mod schema;
pub mod view;

pub use coerce::{CoercionError, MAX_VIEW_DEPTH};
pub use fixup::fixup;
pub use schema::{EnumDescriptor, MemberDescriptor, MemberKind, SchemaError, ViewSchema, ViewSchemaBuilder};
pub use view::{EnumValue, Lookup, ViewInstance, ViewValue};

use serde::{Deserialize, Serialize};

use scr_sdk::{Properties, TypeResolver};

use coerce::Coercer;

/// Materialize a view with default options
pub fn materialize(schema: &ViewSchema, config: &Properties, resolver: &dyn TypeResolver) -> ViewInstance {
    Materializer::default().materialize(schema, config, resolver)
}

/// Materialization options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeOptions {
    /// Materialize nested-view members (absent when off)
    pub nested_views: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self { nested_views: true }
    }
}

/// View materialization engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Materializer {
    options: MaterializeOptions,
}

impl Materializer {
    /// Create an engine with the given options
    pub fn new(options: MaterializeOptions) -> Self {
        Self { options }
    }

    /// Get the engine options
    pub fn options(&self) -> &MaterializeOptions {
        &self.options
    }

    /// Build a view instance from a schema and a configuration map
    pub fn materialize(
        &self,
        schema: &ViewSchema,
        config: &Properties,
        resolver: &dyn TypeResolver,
    ) -> ViewInstance {
        tracing::trace!(view = schema.name(), keys = config.len(), "materializing view");
        Coercer::new(resolver, self.options.nested_views).view(schema, config)
    }
}
