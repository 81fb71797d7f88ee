//! Declared callbacks and their one-shot resolution
//!
//! A [`CallbackMethod`] starts out `NotResolved` (or `NotApplicable` when
//! no name was declared). The first `invoke` or `method_exists` call runs
//! the hierarchy search exactly once and moves it to a terminal state:
//!
//! ```text
//!                 ┌──> Resolved       (found)
//! NotResolved ────┼──> NotFound       (required, not found)
//!                 └──> NotApplicable  (optional, not found)
//! ```
//!
//! Concurrent first calls block on the same initialization; later calls
//! read the cached outcome without locking.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use scr_sdk::ComponentInstance;

use super::class::{ClassId, TypeHierarchy};
use super::invoker::{invoke_method, MethodResult};
use super::locator::{MethodLocator, ResolvedMethod};
use super::shape::{ParameterShape, VersionGate};
use crate::error::BindingError;

/// Observable resolution state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// No callback declared, or an optional one was not found
    NotApplicable,
    /// Search not run yet
    NotResolved,
    /// Required callback not found
    NotFound,
    /// Callback found
    Resolved,
}

/// Terminal outcome of the search
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Method located
    Resolved(ResolvedMethod),
    /// Required method missing; holds the reason
    NotFound(BindingError),
    /// Nothing to invoke
    NotApplicable,
}

impl Resolution {
    /// Get the corresponding state
    pub fn state(&self) -> ResolutionState {
        match self {
            Resolution::Resolved(_) => ResolutionState::Resolved,
            Resolution::NotFound(_) => ResolutionState::NotFound,
            Resolution::NotApplicable => ResolutionState::NotApplicable,
        }
    }
}

/// A declared callback of one category on one component class
pub struct CallbackMethod<S: ParameterShape> {
    name: Option<String>,
    required: bool,
    class_id: ClassId,
    gate: VersionGate,
    shape: S,
    hierarchy: Arc<dyn TypeHierarchy>,
    resolution: OnceCell<Resolution>,
}

impl<S: ParameterShape> CallbackMethod<S> {
    /// Declare a callback.
    ///
    /// A declared name makes the callback required; `None` makes it
    /// permanently not applicable.
    pub fn new(
        name: Option<&str>,
        class_id: ClassId,
        hierarchy: Arc<dyn TypeHierarchy>,
        shape: S,
        gate: VersionGate,
    ) -> Self {
        let resolution = match name {
            Some(_) => OnceCell::new(),
            None => OnceCell::with_value(Resolution::NotApplicable),
        };

        Self {
            name: name.map(str::to_string),
            required: name.is_some(),
            class_id,
            gate,
            shape,
            hierarchy,
            resolution,
        }
    }

    /// Override whether a missing method is an error
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Get the declared name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if a missing method is an error
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Get the parameter shape
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Get the current state without triggering resolution
    pub fn state(&self) -> ResolutionState {
        self.resolution
            .get()
            .map_or(ResolutionState::NotResolved, Resolution::state)
    }

    /// Resolve if needed and get the outcome
    pub fn resolution(&self) -> &Resolution {
        self.resolution.get_or_init(|| self.search())
    }

    /// Check whether invoking can succeed (false only for `NotFound`)
    pub fn method_exists(&self) -> bool {
        !matches!(self.resolution(), Resolution::NotFound(_))
    }

    /// Invoke the callback.
    ///
    /// Returns [`MethodResult::VOID`] when nothing is applicable or the
    /// instance is unavailable, and `fallback` when the method is missing,
    /// its arguments can't be produced, or its body fails.
    pub fn invoke(
        &self,
        instance: Option<&ComponentInstance>,
        raw: &S::Raw,
        fallback: MethodResult,
    ) -> MethodResult {
        let resolved = match self.resolution() {
            Resolution::Resolved(resolved) => resolved,
            Resolution::NotFound(_) => return fallback,
            Resolution::NotApplicable => return MethodResult::VOID,
        };
        let method = &resolved.method;

        tracing::debug!(category = self.shape.category(), method = method.name(), "invoking");

        let Some(instance) = instance else {
            tracing::warn!(method = method.name(), "method cannot be called on unavailable instance");
            return MethodResult::VOID;
        };

        let args = match self.shape.arguments(method.params(), raw) {
            Ok(args) => args,
            Err(source) => {
                let err = BindingError::ArgumentUnavailable {
                    method: method.name().to_string(),
                    source,
                };
                tracing::debug!(method = method.name(), error = %err, "skipping invocation");
                return fallback;
            }
        };

        match invoke_method(method, instance, &args) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(
                    method = method.name(),
                    class = resolved.declaring_class.name(),
                    error = %err,
                    "callback failed"
                );
                fallback
            }
        }
    }

    fn search(&self) -> Resolution {
        let Some(name) = self.name.as_deref() else {
            return Resolution::NotApplicable;
        };
        let category = self.shape.category();

        tracing::debug!(category, method = name, "resolving");

        let (class_name, outcome) = match self.hierarchy.ancestors(self.class_id) {
            Ok(ancestors) => {
                let candidates = self.shape.candidates(self.gate);
                let outcome = MethodLocator::new(name, self.gate).locate(&ancestors, &candidates);
                let class_name = ancestors
                    .first()
                    .map(|leaf| leaf.name().to_string())
                    .unwrap_or_else(|| format!("#{}", self.class_id));
                (class_name, outcome)
            }
            Err(e) => {
                tracing::warn!(method = name, class_id = self.class_id, error = %e, "method cannot be found");
                (format!("#{}", self.class_id), Ok(None))
            }
        };

        let cause = match outcome {
            Ok(Some(resolved)) => return Resolution::Resolved(resolved),
            Ok(None) => BindingError::NotFoundRequired {
                method: name.to_string(),
                class: class_name.clone(),
            },
            Err(ambiguous) => ambiguous,
        };

        if self.required {
            tracing::error!(
                category,
                method = name,
                class = %class_name,
                "method not found; component will fail"
            );
            Resolution::NotFound(cause)
        } else {
            tracing::debug!(category, method = name, class = %class_name, "method not found, ignoring");
            Resolution::NotApplicable
        }
    }
}
