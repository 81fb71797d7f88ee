//! Invocation of resolved method bodies

use std::panic::{self, AssertUnwindSafe};

use scr_sdk::{CallbackError, ComponentInstance, Properties};

use super::class::{MethodDef, ReturnKind};
use super::shape::Argument;
use crate::error::{panic_message, BindingError};

/// Outcome of a callback invocation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodResult {
    /// The invoked method is declared to return a property map
    pub has_property_update: bool,
    /// The returned property map, if any
    pub properties: Option<Properties>,
}

impl MethodResult {
    /// Neutral success: nothing returned
    pub const VOID: MethodResult = MethodResult {
        has_property_update: false,
        properties: None,
    };

    /// Result carrying a property update
    pub fn update(properties: Properties) -> Self {
        Self {
            has_property_update: true,
            properties: Some(properties),
        }
    }
}

/// Call a method body on an instance.
///
/// Errors and panics raised by the body come back as
/// [`BindingError::InBodyFailure`].
pub fn invoke_method(
    method: &MethodDef,
    instance: &ComponentInstance,
    args: &[Argument],
) -> Result<MethodResult, BindingError> {
    let body = method.body();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(instance, args)))
        .unwrap_or_else(|payload| Err(CallbackError::Panicked(panic_message(payload.as_ref()))));

    match outcome {
        Ok(properties) => Ok(MethodResult {
            has_property_update: *method.return_kind() != ReturnKind::Void,
            properties,
        }),
        Err(source) => Err(BindingError::InBodyFailure {
            method: method.name().to_string(),
            source,
        }),
    }
}
