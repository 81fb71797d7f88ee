//! SCR SDK - collaborator types for the component binding layer
//!
//! This crate holds the value model and host-supplied handles that the
//! binding engine and its hosting runtime share, without depending on the
//! engine itself:
//!
//! - [`PropertyValue`] / [`Properties`]: untyped configuration maps
//! - [`ComponentContext`], [`BundleContext`], [`ServiceReference`],
//!   [`ServiceObject`]: arguments handed to component callbacks
//! - [`ComponentInstance`]: the opaque target of a callback
//! - [`TypeResolver`]: the host's type-name lookup capability
//!
//! # Example
//!
//! ```ignore
//! use scr_sdk::{Properties, PropertyValue, StaticTypeResolver, TypeResolver};
//!
//! let mut props = Properties::new();
//! props.insert("service.ranking".into(), PropertyValue::Int(10));
//!
//! let resolver = StaticTypeResolver::with_types(["org.example.Greeter"]);
//! assert!(resolver.resolve("org.example.Greeter").is_ok());
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod value;

pub use context::{
    BundleContext, ComponentContext, ComponentInstance, ServiceObject, ServiceReference,
    StaticTypeResolver, TypeHandle, TypeResolver,
};
pub use error::{CallbackError, ResolveError};
pub use value::{Properties, PropertyValue};
