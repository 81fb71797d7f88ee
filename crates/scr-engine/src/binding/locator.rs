//! Method lookup over a class hierarchy
//!
//! Walks the ancestor list from the leaf toward the root. At each level the
//! call site's candidate signatures are tried in order and the first
//! declared match that passes [`accept`] is returned. A level with matches
//! but none acceptable aborts the search with
//! [`BindingError::AmbiguousAccess`] instead of looking further up, where
//! an unrelated overload might be picked.
//!
//! Two flags track what the current level may contribute and only ever
//! narrow while ascending: private methods are accepted at the leaf only,
//! package methods only while the ancestor shares the leaf's loader and
//! package.

use std::sync::Arc;

use super::class::{ClassDef, MethodDef, ReturnKind, Visibility};
use super::shape::{Signature, VersionGate};
use crate::error::BindingError;

/// A located method together with its declaring class
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    /// Class that declares the method
    pub declaring_class: Arc<ClassDef>,
    /// The method
    pub method: MethodDef,
}

/// Searches an ancestor list for one callback name
#[derive(Debug, Clone, Copy)]
pub struct MethodLocator<'a> {
    name: &'a str,
    gate: VersionGate,
}

impl<'a> MethodLocator<'a> {
    /// Create a locator for a callback name under a version gate
    pub fn new(name: &'a str, gate: VersionGate) -> Self {
        Self { name, gate }
    }

    /// Search `ancestors` (leaf first) for the first acceptable candidate.
    ///
    /// Returns `Ok(None)` when no level declares any candidate.
    pub fn locate(
        &self,
        ancestors: &[Arc<ClassDef>],
        candidates: &[Signature],
    ) -> Result<Option<ResolvedMethod>, BindingError> {
        let Some(leaf) = ancestors.first() else {
            return Ok(None);
        };

        let mut accept_private = self.gate.relaxed_visibility;
        let mut accept_package = self.gate.relaxed_visibility;

        for (level, class) in ancestors.iter().enumerate() {
            if level > 0 {
                accept_package &= class.loader() == leaf.loader()
                    && class.package_name() == leaf.package_name();
                accept_private = false;
            }

            tracing::debug!(method = self.name, class = class.name(), "locating method");

            let mut rejected = false;
            for signature in candidates {
                let Some(method) = class.declared_method(self.name, signature) else {
                    continue;
                };

                if accept(method, accept_private, accept_package, self.gate.return_properties) {
                    tracing::debug!(
                        method = self.name,
                        class = class.name(),
                        params = ?method.params(),
                        "found method"
                    );
                    return Ok(Some(ResolvedMethod {
                        declaring_class: Arc::clone(class),
                        method: method.clone(),
                    }));
                }
                rejected = true;
            }

            if rejected {
                tracing::error!(
                    method = self.name,
                    class = class.name(),
                    leaf = leaf.name(),
                    "suitable but non-accessible method found"
                );
                return Err(BindingError::AmbiguousAccess {
                    method: self.name.to_string(),
                    class: class.name().to_string(),
                    leaf: leaf.name().to_string(),
                });
            }
        }

        Ok(None)
    }
}

/// Check whether a signature match may be invoked.
///
/// The method must be non-static and return void (or a property map when
/// `allow_return_value` is set). Public and protected methods are always
/// accepted; private and package methods only while the respective flag
/// holds.
pub fn accept(method: &MethodDef, accept_private: bool, accept_package: bool, allow_return_value: bool) -> bool {
    let returns_ok = match method.return_kind() {
        ReturnKind::Void => true,
        ReturnKind::PropertyMap => allow_return_value,
        ReturnKind::Other(_) => false,
    };
    if !returns_ok {
        return false;
    }

    let modifiers = method.modifiers();
    if modifiers.is_static {
        return false;
    }

    match modifiers.visibility {
        Visibility::Public | Visibility::Protected => true,
        Visibility::Private => accept_private,
        Visibility::Package => accept_package,
    }
}
