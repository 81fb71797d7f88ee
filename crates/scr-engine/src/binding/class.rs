//! Reflective member surface of component classes
//!
//! The binding engine doesn't inspect real types. Instead the host
//! describes each implementation class as a [`ClassDef`]: its name, the
//! loader that defined it, its parent, and the callback-capable methods it
//! declares, each with an invocable body. The [`TypeHierarchy`] trait turns
//! a leaf class into the explicit leaf-to-root ancestor list the method
//! locator walks.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use scr_sdk::{CallbackError, ComponentInstance, Properties};

use super::shape::Argument;
use crate::error::LocateError;

/// Class identifier (index into the registry)
pub type ClassId = usize;

/// Identifier of the loader (namespace) that defined a class
pub type LoaderId = u64;

// ============================================================================
// Method Surface
// ============================================================================

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere
    #[default]
    Public,
    /// Visible to subclasses
    Protected,
    /// Visible within the declaring package and loader
    Package,
    /// Visible only in the declaring class
    Private,
}

/// Modifier flags for a declared method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Declared visibility
    pub visibility: Visibility,
    /// Static member
    pub is_static: bool,
}

/// Parameter type of a callback signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// The component context
    ComponentContext,
    /// The declaring bundle's context
    BundleContext,
    /// A property map
    PropertyMap,
    /// A service reference
    ServiceReference,
    /// A 32-bit integer (deactivation reason)
    Int,
    /// A service object of the named interface
    Service(String),
    /// A view materialized from the named schema
    View(String),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::ComponentContext => f.write_str("ComponentContext"),
            ParamType::BundleContext => f.write_str("BundleContext"),
            ParamType::PropertyMap => f.write_str("Map"),
            ParamType::ServiceReference => f.write_str("ServiceReference"),
            ParamType::Int => f.write_str("int"),
            ParamType::Service(name) | ParamType::View(name) => f.write_str(name),
        }
    }
}

/// Declared return type of a method
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReturnKind {
    /// No return value
    #[default]
    Void,
    /// A property map (configuration update)
    PropertyMap,
    /// Any other type
    Other(String),
}

/// Invocable method body.
///
/// Returns `Some(map)` when a property-map returning method produced a
/// value, `None` otherwise.
pub type MethodBody = Arc<
    dyn Fn(&ComponentInstance, &[Argument]) -> Result<Option<Properties>, CallbackError>
        + Send
        + Sync,
>;

/// A method declared by a class
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    params: Vec<ParamType>,
    returns: ReturnKind,
    modifiers: Modifiers,
    body: MethodBody,
}

impl MethodDef {
    /// Declare a public, non-static, void method with no parameters
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&ComponentInstance, &[Argument]) -> Result<Option<Properties>, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: ReturnKind::Void,
            modifiers: Modifiers::default(),
            body: Arc::new(body),
        }
    }

    /// Append a parameter
    pub fn param(mut self, param: ParamType) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type
    pub fn returns(mut self, returns: ReturnKind) -> Self {
        self.returns = returns;
        self
    }

    /// Set the visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.modifiers.visibility = visibility;
        self
    }

    /// Mark the method static
    pub fn as_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// Get the method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parameter types
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Get the return type
    pub fn return_kind(&self) -> &ReturnKind {
        &self.returns
    }

    /// Get the modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Get the invocable body
    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Check name and exact parameter list
    pub fn matches(&self, name: &str, params: &[ParamType]) -> bool {
        self.name == name && self.params == params
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Classes
// ============================================================================

/// A component implementation class
#[derive(Debug, Clone)]
pub struct ClassDef {
    id: ClassId,
    name: String,
    loader: LoaderId,
    parent_id: Option<ClassId>,
    methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Declare a root class with a fully qualified name
    pub fn new(name: impl Into<String>, loader: LoaderId) -> Self {
        Self {
            id: 0,
            name: name.into(),
            loader,
            parent_id: None,
            methods: Vec::new(),
        }
    }

    /// Set the parent class
    pub fn extends(mut self, parent_id: ClassId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Add a declared method
    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Get the class id (assigned at registration)
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Get the fully qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the defining loader
    pub fn loader(&self) -> LoaderId {
        self.loader
    }

    /// Get the parent class id
    pub fn parent_id(&self) -> Option<ClassId> {
        self.parent_id
    }

    /// Get all declared methods
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// Package name: everything before the last `.` (empty for the
    /// default package)
    pub fn package_name(&self) -> &str {
        self.name
            .rfind('.')
            .map(|dot| &self.name[..dot])
            .unwrap_or("")
    }

    /// Find a method declared by this class (not inherited)
    pub fn declared_method(&self, name: &str, params: &[ParamType]) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.matches(name, params))
    }
}

/// Source of leaf-to-root ancestor lists
pub trait TypeHierarchy: Send + Sync {
    /// List `leaf` followed by each ancestor up to the root
    fn ancestors(&self, leaf: ClassId) -> Result<Vec<Arc<ClassDef>>, LocateError>;
}

/// Registry of component classes
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Arc<ClassDef>>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, assigning its ID
    pub fn register_class(&mut self, mut class: ClassDef) -> ClassId {
        let id = self.classes.len();
        class.id = id;
        self.name_to_id.insert(class.name.clone(), id);
        self.classes.push(Arc::new(class));
        id
    }

    /// Get class by ID
    pub fn get_class(&self, id: ClassId) -> Option<&Arc<ClassDef>> {
        self.classes.get(id)
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Arc<ClassDef>> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(*id))
    }

    /// Get number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no classes are registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TypeHierarchy for ClassRegistry {
    fn ancestors(&self, leaf: ClassId) -> Result<Vec<Arc<ClassDef>>, LocateError> {
        let mut hierarchy = Vec::new();
        let mut current_id = Some(leaf);

        while let Some(id) = current_id {
            if hierarchy.len() > self.classes.len() {
                return Err(LocateError::Cycle(leaf));
            }
            let class = self.classes.get(id).ok_or(LocateError::MissingClass(id))?;
            hierarchy.push(Arc::clone(class));
            current_id = class.parent_id;
        }

        Ok(hierarchy)
    }
}
