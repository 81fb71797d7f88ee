//! Descriptive records of declared and bound references
//!
//! Plain serde data holders for runtime introspection. Field names
//! serialize in camelCase.

use serde::{Deserialize, Serialize};

use scr_sdk::{Properties, ServiceReference};

use crate::binding::{ReferenceKind, ReferenceShape};

/// A reference declared by a component description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDto {
    /// Reference name
    pub name: String,
    /// Service interface name
    pub interface_name: String,
    /// Cardinality (`0..1`, `1..1`, `0..n`, `1..n`)
    pub cardinality: String,
    /// Policy (`static` or `dynamic`)
    pub policy: String,
    /// Policy option (`reluctant` or `greedy`)
    pub policy_option: String,
    /// Target filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Bind callback name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Unbind callback name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbind: Option<String>,
    /// Updated callback name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Service scope (`bundle`, `prototype` or `prototype_required`)
    pub scope: String,
}

impl ReferenceDto {
    /// Get the declared callback name for a category
    pub fn callback_name(&self, kind: ReferenceKind) -> Option<&str> {
        match kind {
            ReferenceKind::Bind => self.bind.as_deref(),
            ReferenceKind::Unbind => self.unbind.as_deref(),
            ReferenceKind::Updated => self.updated.as_deref(),
        }
    }

    /// Parameter shape of this reference's callbacks of a category
    pub fn shape(&self, kind: ReferenceKind) -> ReferenceShape {
        ReferenceShape::new(kind, self.interface_name.clone())
    }
}

/// A registered service as seen by introspection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReferenceDto {
    /// Service id
    pub id: u64,
    /// Id of the registering bundle
    pub bundle: u64,
    /// Registration properties
    pub properties: Properties,
    /// Ids of bundles using the service
    #[serde(default)]
    pub using_bundles: Vec<u64>,
}

impl ServiceReferenceDto {
    /// Describe a service reference registered by `bundle`
    pub fn new(reference: &ServiceReference, bundle: u64) -> Self {
        Self {
            id: reference.service_id(),
            bundle,
            properties: reference.properties().clone(),
            using_bundles: Vec::new(),
        }
    }
}

/// Services currently bound to a reference
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundReferenceDto {
    /// Reference name
    pub name: String,
    /// Effective target filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Bound services
    #[serde(default)]
    pub service_references: Vec<ServiceReferenceDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use scr_sdk::PropertyValue;

    fn log_reference() -> ReferenceDto {
        ReferenceDto {
            name: "log".into(),
            interface_name: "org.osgi.service.log.LogService".into(),
            cardinality: "0..1".into(),
            policy: "dynamic".into(),
            policy_option: "reluctant".into(),
            bind: Some("setLog".into()),
            unbind: Some("unsetLog".into()),
            scope: "bundle".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_callback_names() {
        let dto = log_reference();
        assert_eq!(dto.callback_name(ReferenceKind::Bind), Some("setLog"));
        assert_eq!(dto.callback_name(ReferenceKind::Updated), None);
        assert_eq!(
            dto.shape(ReferenceKind::Unbind).interface(),
            "org.osgi.service.log.LogService"
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(log_reference()).unwrap();
        assert_eq!(json["interfaceName"], "org.osgi.service.log.LogService");
        assert_eq!(json["policyOption"], "reluctant");
        assert!(json.get("updated").is_none());
    }

    #[test]
    fn test_bound_reference_roundtrip() {
        let mut props = Properties::new();
        props.insert("service.ranking".into(), PropertyValue::Long(5));
        let reference = ServiceReference::new(42, props);

        let bound = BoundReferenceDto {
            name: "log".into(),
            target: Some("(vendor=acme)".into()),
            service_references: vec![ServiceReferenceDto::new(&reference, 7)],
        };

        let text = serde_json::to_string(&bound).unwrap();
        assert!(text.contains("\"serviceReferences\""));
        let parsed: BoundReferenceDto = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, bound);
    }
}
