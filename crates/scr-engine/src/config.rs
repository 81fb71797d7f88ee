//! Engine configuration (`scr.toml`)
//!
//! ```toml
//! [binding]
//! version = "1.2-felix"
//!
//! [materialize]
//! nested_views = true
//! ```
//!
//! Every section and key is optional.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::binding::VersionGate;
use crate::error::ConfigError;
use crate::materialize::{MaterializeOptions, Materializer};

/// Declared component description version, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DsVersion {
    /// 1.0
    V1_0,
    /// 1.1
    V1_1,
    /// 1.1 with Felix extensions
    V1_1Felix,
    /// 1.2
    V1_2,
    /// 1.2 with Felix extensions
    V1_2Felix,
    /// 1.3
    #[default]
    V1_3,
}

impl DsVersion {
    /// Get the canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            DsVersion::V1_0 => "1.0",
            DsVersion::V1_1 => "1.1",
            DsVersion::V1_1Felix => "1.1-felix",
            DsVersion::V1_2 => "1.2",
            DsVersion::V1_2Felix => "1.2-felix",
            DsVersion::V1_3 => "1.3",
        }
    }

    /// Feature flags enabled by this version
    pub fn gate(&self) -> VersionGate {
        VersionGate {
            relaxed_visibility: *self >= DsVersion::V1_1,
            return_properties: *self >= DsVersion::V1_2Felix,
        }
    }
}

impl FromStr for DsVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(DsVersion::V1_0),
            "1.1" => Ok(DsVersion::V1_1),
            "1.1-felix" => Ok(DsVersion::V1_1Felix),
            "1.2" => Ok(DsVersion::V1_2),
            "1.2-felix" => Ok(DsVersion::V1_2Felix),
            "1.3" => Ok(DsVersion::V1_3),
            other => Err(ConfigError::InvalidVersion(other.to_string())),
        }
    }
}

impl TryFrom<String> for DsVersion {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DsVersion> for String {
    fn from(version: DsVersion) -> Self {
        version.as_str().to_string()
    }
}

impl fmt::Display for DsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[binding]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Declared description version
    pub version: DsVersion,
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Binding engine settings
    pub binding: BindingConfig,
    /// Materialization settings
    pub materialize: MaterializeOptions,
}

impl EngineConfig {
    /// Load a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        tracing::debug!(
            version = %config.binding.version,
            nested_views = config.materialize.nested_views,
            "loaded engine config"
        );
        Ok(config)
    }

    /// Version gate for callback resolution
    pub fn gate(&self) -> VersionGate {
        self.binding.version.gate()
    }

    /// Materialization engine with these settings
    pub fn materializer(&self) -> Materializer {
        Materializer::new(self.materialize)
    }
}
