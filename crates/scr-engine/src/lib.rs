//! SCR Engine
//!
//! The reflective binding layer of the component runtime:
//! - **Binding**: locating, resolving once, and invoking lifecycle and
//!   reference callbacks on component classes (`binding` module)
//! - **Materialization**: turning configuration maps into typed views
//!   described by schemas (`materialize` module)
//! - **Config**: engine settings loaded from TOML (`config` module)
//! - **DTOs**: descriptive reference records (`dto` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use scr_engine::materialize::{materialize, MemberDescriptor, MemberKind, ViewSchema};
//!
//! let schema = ViewSchema::builder("Http")
//!     .member(MemberDescriptor::scalar("http_port", MemberKind::Int).with_default(8080))
//!     .build()?;
//!
//! let view = materialize(&schema, &properties, &resolver);
//! assert_eq!(view.get_i64("http_port"), Some(8080));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![cfg_attr(test, allow(clippy::approx_constant))]

pub mod binding;
pub mod config;
pub mod dto;
pub mod error;
pub mod materialize;

pub use binding::{
    ActivatorParameter, BindParameter, CallbackMethod, ClassDef, ClassRegistry, LifecycleShape,
    MethodDef, MethodResult, ReferenceShape, ResolutionState, VersionGate,
};
pub use config::{DsVersion, EngineConfig};
pub use error::{ArgumentError, BindingError, ConfigError, LocateError};
pub use materialize::{materialize, Materializer, ViewInstance, ViewSchema, ViewValue};
