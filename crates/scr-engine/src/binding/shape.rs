//! Call-site parameter shapes
//!
//! Each callback category accepts its own set of signatures, tried in
//! priority order, and knows how to turn the raw call-site parameter into
//! the argument list of whichever signature was resolved.
//!
//! | Category                     | Candidates (relaxed gate adds the rest)          |
//! |------------------------------|--------------------------------------------------|
//! | activate, modified           | `(ComponentContext)` / `(BundleContext)`, `(Map)`, `(View)`*, combinations, `()` |
//! | deactivate                   | as activate, plus `(int)` alone and in combinations |
//!
//! Combinations are ordered lists of two or more distinct base parameter
//! types, e.g. `(ComponentContext, BundleContext, Map)`.
//! | bind, unbind, updated        | `(ServiceReference)`, `(S)` / `(S, Map)`         |

use std::sync::Arc;

use scr_sdk::{
    BundleContext, ComponentContext, Properties, ServiceObject, ServiceReference,
    StaticTypeResolver, TypeResolver,
};

use super::class::ParamType;
use crate::error::ArgumentError;
use crate::materialize::{Materializer, ViewInstance, ViewSchema};

/// Ordered parameter list of one candidate signature
pub type Signature = Vec<ParamType>;

/// Feature flags derived from the declared description version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionGate {
    /// Accept private methods at the leaf and package methods within the
    /// leaf's package and loader; enables the wider candidate lists
    pub relaxed_visibility: bool,
    /// Accept methods returning a property map
    pub return_properties: bool,
}

/// Concrete argument handed to a method body
#[derive(Debug, Clone)]
pub enum Argument {
    /// Component context
    ComponentContext(ComponentContext),
    /// Bundle context
    BundleContext(BundleContext),
    /// Property map
    Properties(Properties),
    /// Service reference
    ServiceReference(ServiceReference),
    /// Bound service object
    Service(ServiceObject),
    /// Integer (deactivation reason)
    Int(i32),
    /// Materialized view
    View(ViewInstance),
}

impl Argument {
    /// Borrow a component context argument
    pub fn as_component_context(&self) -> Option<&ComponentContext> {
        match self {
            Argument::ComponentContext(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Borrow a bundle context argument
    pub fn as_bundle_context(&self) -> Option<&BundleContext> {
        match self {
            Argument::BundleContext(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Borrow a property map argument
    pub fn as_properties(&self) -> Option<&Properties> {
        match self {
            Argument::Properties(props) => Some(props),
            _ => None,
        }
    }

    /// Borrow a service reference argument
    pub fn as_service_reference(&self) -> Option<&ServiceReference> {
        match self {
            Argument::ServiceReference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Borrow a service object argument
    pub fn as_service(&self) -> Option<&ServiceObject> {
        match self {
            Argument::Service(service) => Some(service),
            _ => None,
        }
    }

    /// Get an integer argument
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Argument::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow a view argument
    pub fn as_view(&self) -> Option<&ViewInstance> {
        match self {
            Argument::View(view) => Some(view),
            _ => None,
        }
    }
}

/// Signature strategy of one callback category
pub trait ParameterShape: Send + Sync {
    /// Raw parameter supplied at the call site
    type Raw;

    /// Category name for diagnostics
    fn category(&self) -> &'static str;

    /// Acceptable signatures, most specific first
    fn candidates(&self, gate: VersionGate) -> Vec<Signature>;

    /// Map the raw parameter to the arguments of a resolved signature
    fn arguments(&self, params: &[ParamType], raw: &Self::Raw) -> Result<Vec<Argument>, ArgumentError>;
}

// ============================================================================
// Lifecycle Callbacks
// ============================================================================

/// Lifecycle callback category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    /// Component activation
    Activate,
    /// Component deactivation
    Deactivate,
    /// Configuration change
    Modified,
}

/// Raw parameter of lifecycle callbacks
#[derive(Debug, Clone)]
pub struct ActivatorParameter {
    /// Context of the component being (de)activated
    pub component_context: ComponentContext,
    /// Deactivation reason code (0 for activate and modified)
    pub reason: i32,
}

impl ActivatorParameter {
    /// Create a parameter with reason 0
    pub fn new(component_context: ComponentContext) -> Self {
        Self {
            component_context,
            reason: 0,
        }
    }

    /// Set the deactivation reason
    pub fn with_reason(mut self, reason: i32) -> Self {
        self.reason = reason;
        self
    }
}

/// Parameter shape of activate / deactivate / modified callbacks
pub struct LifecycleShape {
    kind: LifecycleKind,
    views: Vec<Arc<ViewSchema>>,
    resolver: Arc<dyn TypeResolver>,
    materializer: Materializer,
}

impl LifecycleShape {
    /// Create a shape for the given category
    pub fn new(kind: LifecycleKind) -> Self {
        Self {
            kind,
            views: Vec::new(),
            resolver: Arc::new(StaticTypeResolver::new()),
            materializer: Materializer::default(),
        }
    }

    /// Shape of activate callbacks
    pub fn activate() -> Self {
        Self::new(LifecycleKind::Activate)
    }

    /// Shape of deactivate callbacks
    pub fn deactivate() -> Self {
        Self::new(LifecycleKind::Deactivate)
    }

    /// Shape of modified callbacks
    pub fn modified() -> Self {
        Self::new(LifecycleKind::Modified)
    }

    /// Accept a view parameter of this schema
    pub fn with_view(mut self, schema: Arc<ViewSchema>) -> Self {
        self.views.push(schema);
        self
    }

    /// Set the type resolver used when materializing views
    pub fn with_resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the engine used when materializing views
    pub fn with_materializer(mut self, materializer: Materializer) -> Self {
        self.materializer = materializer;
        self
    }

    /// Get the category
    pub fn kind(&self) -> LifecycleKind {
        self.kind
    }
}

impl ParameterShape for LifecycleShape {
    type Raw = ActivatorParameter;

    fn category(&self) -> &'static str {
        match self.kind {
            LifecycleKind::Activate => "activate",
            LifecycleKind::Deactivate => "deactivate",
            LifecycleKind::Modified => "modified",
        }
    }

    fn candidates(&self, gate: VersionGate) -> Vec<Signature> {
        let mut candidates = vec![vec![ParamType::ComponentContext]];
        if gate.relaxed_visibility {
            candidates.push(vec![ParamType::BundleContext]);
            candidates.push(vec![ParamType::PropertyMap]);
            candidates.extend(
                self.views
                    .iter()
                    .map(|schema| vec![ParamType::View(schema.name().to_string())]),
            );
            let mut base = vec![
                ParamType::ComponentContext,
                ParamType::BundleContext,
                ParamType::PropertyMap,
            ];
            if self.kind == LifecycleKind::Deactivate {
                candidates.push(vec![ParamType::Int]);
                base.push(ParamType::Int);
            }
            candidates.extend(combinations(&base));
            candidates.push(Vec::new());
        }
        candidates
    }

    fn arguments(&self, params: &[ParamType], raw: &ActivatorParameter) -> Result<Vec<Argument>, ArgumentError> {
        let ctx = &raw.component_context;
        params
            .iter()
            .map(|param| match param {
                ParamType::ComponentContext => Ok(Argument::ComponentContext(ctx.clone())),
                ParamType::BundleContext => Ok(Argument::BundleContext(ctx.bundle_context().clone())),
                ParamType::PropertyMap => Ok(Argument::Properties(ctx.properties().clone())),
                ParamType::Int => Ok(Argument::Int(raw.reason)),
                ParamType::View(name) => {
                    let schema = self
                        .views
                        .iter()
                        .find(|schema| schema.name() == name.as_str())
                        .ok_or_else(|| ArgumentError::UnknownView(name.clone()))?;
                    Ok(Argument::View(self.materializer.materialize(
                        schema,
                        ctx.properties(),
                        self.resolver.as_ref(),
                    )))
                }
                other => Err(ArgumentError::Unsupported(other.to_string())),
            })
            .collect()
    }
}

/// Ordered selections of two or more distinct parameter types, shortest first
fn combinations(types: &[ParamType]) -> Vec<Signature> {
    let mut layer: Vec<Signature> = types.iter().map(|t| vec![t.clone()]).collect();
    let mut all = Vec::new();

    for _ in 1..types.len() {
        layer = layer
            .iter()
            .flat_map(move |signature| {
                types
                    .iter()
                    .filter(move |t| !signature.contains(*t))
                    .map(move |t| {
                        let mut next = signature.clone();
                        next.push(t.clone());
                        next
                    })
            })
            .collect();
        all.extend(layer.iter().cloned());
    }

    all
}

// ============================================================================
// Reference Callbacks
// ============================================================================

/// Reference callback category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Service bound
    Bind,
    /// Service unbound
    Unbind,
    /// Bound service's properties changed
    Updated,
}

/// Raw parameter of reference callbacks
#[derive(Debug, Clone)]
pub struct BindParameter {
    /// Reference to the bound service
    pub reference: ServiceReference,
    /// Service object, when obtainable
    pub service: Option<ServiceObject>,
}

impl BindParameter {
    /// Create a parameter for a reference and its service object
    pub fn new(reference: ServiceReference, service: Option<ServiceObject>) -> Self {
        Self { reference, service }
    }
}

/// Parameter shape of bind / unbind / updated callbacks
#[derive(Debug, Clone)]
pub struct ReferenceShape {
    kind: ReferenceKind,
    interface: String,
}

impl ReferenceShape {
    /// Create a shape for a reference to the named service interface
    pub fn new(kind: ReferenceKind, interface: impl Into<String>) -> Self {
        Self {
            kind,
            interface: interface.into(),
        }
    }

    /// Get the category
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Get the service interface name
    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl ParameterShape for ReferenceShape {
    type Raw = BindParameter;

    fn category(&self) -> &'static str {
        match self.kind {
            ReferenceKind::Bind => "bind",
            ReferenceKind::Unbind => "unbind",
            ReferenceKind::Updated => "updated",
        }
    }

    fn candidates(&self, gate: VersionGate) -> Vec<Signature> {
        let service = ParamType::Service(self.interface.clone());
        let mut candidates = vec![vec![ParamType::ServiceReference], vec![service.clone()]];
        if gate.relaxed_visibility {
            candidates.push(vec![service, ParamType::PropertyMap]);
        }
        candidates
    }

    fn arguments(&self, params: &[ParamType], raw: &BindParameter) -> Result<Vec<Argument>, ArgumentError> {
        params
            .iter()
            .map(|param| match param {
                ParamType::ServiceReference => Ok(Argument::ServiceReference(raw.reference.clone())),
                ParamType::Service(_) => raw
                    .service
                    .clone()
                    .map(Argument::Service)
                    .ok_or(ArgumentError::ServiceUnavailable(raw.reference.service_id())),
                ParamType::PropertyMap => Ok(Argument::Properties(raw.reference.properties().clone())),
                other => Err(ArgumentError::Unsupported(other.to_string())),
            })
            .collect()
    }
}
