//! Collaborator handles supplied by the hosting runtime
//!
//! The binding layer never creates bundles, services or component
//! instances itself. The host hands them in through these types, and the
//! binding engine passes them on to callback bodies as arguments.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::ResolveError;
use crate::value::{Properties, PropertyValue};

// ============================================================================
// Bundle / Component Context
// ============================================================================

/// Handle to the bundle that declared a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleContext {
    bundle_id: u64,
    symbolic_name: String,
}

impl BundleContext {
    /// Create a new bundle context handle
    pub fn new(bundle_id: u64, symbolic_name: impl Into<String>) -> Self {
        Self {
            bundle_id,
            symbolic_name: symbolic_name.into(),
        }
    }

    /// Get the bundle id
    pub fn bundle_id(&self) -> u64 {
        self.bundle_id
    }

    /// Get the bundle symbolic name
    pub fn symbolic_name(&self) -> &str {
        &self.symbolic_name
    }
}

/// Per-activation context handed to lifecycle callbacks
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentContext {
    component_name: String,
    properties: Properties,
    bundle_context: BundleContext,
}

impl ComponentContext {
    /// Create a new component context
    pub fn new(
        component_name: impl Into<String>,
        properties: Properties,
        bundle_context: BundleContext,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            properties,
            bundle_context,
        }
    }

    /// Get the component name
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Get the component configuration
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Get the declaring bundle's context
    pub fn bundle_context(&self) -> &BundleContext {
        &self.bundle_context
    }
}

// ============================================================================
// Services
// ============================================================================

/// Reference to a registered service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReference {
    service_id: u64,
    properties: Properties,
}

impl ServiceReference {
    /// Create a new service reference
    pub fn new(service_id: u64, properties: Properties) -> Self {
        Self {
            service_id,
            properties,
        }
    }

    /// Get the service id
    pub fn service_id(&self) -> u64 {
        self.service_id
    }

    /// Get the service registration properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Get a single registration property
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

/// Opaque service object obtained for a bound reference
#[derive(Clone)]
pub struct ServiceObject(Arc<dyn Any + Send + Sync>);

impl ServiceObject {
    /// Wrap a service implementation
    pub fn new<T: Any + Send + Sync>(service: T) -> Self {
        Self(Arc::new(service))
    }

    /// Downcast to the concrete service type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Check whether two handles refer to the same service object
    pub fn ptr_eq(&self, other: &ServiceObject) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ServiceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceObject({:p})", Arc::as_ptr(&self.0))
    }
}

// ============================================================================
// Component Instance
// ============================================================================

/// Target instance on which callbacks are invoked.
///
/// Tagged with the id of its implementation class; the state itself is
/// opaque to the binding layer and only downcast by callback bodies.
#[derive(Clone)]
pub struct ComponentInstance {
    class_id: usize,
    state: Arc<dyn Any + Send + Sync>,
}

impl ComponentInstance {
    /// Create a new instance of the given class
    pub fn new<T: Any + Send + Sync>(class_id: usize, state: T) -> Self {
        Self {
            class_id,
            state: Arc::new(state),
        }
    }

    /// Get the implementation class id
    pub fn class_id(&self) -> usize {
        self.class_id
    }

    /// Downcast the instance state
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.state.downcast_ref::<T>()
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("class_id", &self.class_id)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Type Resolution
// ============================================================================

/// A type resolved by name through the hosting runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    name: String,
}

impl TypeHandle {
    /// Create a handle for a type name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the fully qualified type name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// String → type capability supplied by the hosting runtime.
///
/// Implementations may block (e.g. loading a class from a bundle).
pub trait TypeResolver: Send + Sync {
    /// Resolve a fully qualified type name
    fn resolve(&self, name: &str) -> Result<TypeHandle, ResolveError>;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> Result<TypeHandle, ResolveError> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Result<TypeHandle, ResolveError> {
        self(name)
    }
}

/// Resolver backed by an explicit set of known type names
#[derive(Debug, Default)]
pub struct StaticTypeResolver {
    types: RwLock<FxHashMap<String, TypeHandle>>,
}

impl StaticTypeResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver that knows the given type names
    pub fn with_types<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolver = Self::new();
        for name in names {
            resolver.register(name);
        }
        resolver
    }

    /// Make a type name resolvable
    pub fn register(&self, name: impl Into<String>) -> TypeHandle {
        let name = name.into();
        let handle = TypeHandle::new(name.clone());
        self.types.write().insert(name, handle.clone());
        handle
    }

    /// Check if a type name is known
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }
}

impl TypeResolver for StaticTypeResolver {
    fn resolve(&self, name: &str) -> Result<TypeHandle, ResolveError> {
        self.types
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_instance_downcast() {
        struct Counter(u32);

        let instance = ComponentInstance::new(3, Counter(7));
        assert_eq!(instance.class_id(), 3);
        assert_eq!(instance.downcast_ref::<Counter>().map(|c| c.0), Some(7));
        assert!(instance.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_service_object_identity() {
        let a = ServiceObject::new(String::from("log"));
        let b = a.clone();
        let c = ServiceObject::new(String::from("log"));

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a.downcast_ref::<String>().map(|s| s.as_str()), Some("log"));
    }

    #[test]
    fn test_static_resolver() {
        let resolver = StaticTypeResolver::with_types(["java.lang.String"]);
        assert!(resolver.contains("java.lang.String"));

        let handle = resolver.resolve("java.lang.String").unwrap();
        assert_eq!(handle.name(), "java.lang.String");

        assert_eq!(
            resolver.resolve("java.lang.Missing"),
            Err(ResolveError::NotFound("java.lang.Missing".to_string()))
        );
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str| -> Result<TypeHandle, ResolveError> {
            if name.starts_with("ok.") {
                Ok(TypeHandle::new(name))
            } else {
                Err(ResolveError::LoadFailed {
                    name: name.to_string(),
                    reason: "no loader".to_string(),
                })
            }
        };

        assert!(TypeResolver::resolve(&resolver, "ok.Type").is_ok());
        assert!(TypeResolver::resolve(&resolver, "bad.Type").is_err());
    }
}
