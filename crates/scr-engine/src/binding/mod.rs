//! Callback binding engine
//!
//! Locates lifecycle and reference callbacks on component classes and
//! invokes them:
//!
//! - [`class`]: the reflective surface (classes, methods, hierarchy)
//! - [`shape`]: per-category candidate signatures and argument mapping
//! - [`locator`]: the hierarchy walk and acceptance rules
//! - [`method`]: the resolve-once state machine and `invoke`
//! - [`invoker`]: calling a body and normalizing its failures
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = ClassRegistry::new();
//! let id = registry.register_class(
//!     ClassDef::new("org.example.Greeter", 1)
//!         .method(MethodDef::new("activate", |_, _| Ok(None)).param(ParamType::ComponentContext)),
//! );
//!
//! let activate = CallbackMethod::new(
//!     Some("activate"),
//!     id,
//!     Arc::new(registry),
//!     LifecycleShape::activate(),
//!     DsVersion::V1_3.gate(),
//! );
//! let result = activate.invoke(Some(&instance), &ActivatorParameter::new(ctx), MethodResult::VOID);
//! ```

pub mod class;
pub mod invoker;
pub mod locator;
pub mod method;
pub mod shape;

pub use class::{
    ClassDef, ClassId, ClassRegistry, LoaderId, MethodBody, MethodDef, Modifiers, ParamType,
    ReturnKind, TypeHierarchy, Visibility,
};
pub use invoker::{invoke_method, MethodResult};
pub use locator::{accept, MethodLocator, ResolvedMethod};
pub use method::{CallbackMethod, Resolution, ResolutionState};
pub use shape::{
    ActivatorParameter, Argument, BindParameter, LifecycleKind, LifecycleShape, ParameterShape,
    ReferenceKind, ReferenceShape, Signature, VersionGate,
};
