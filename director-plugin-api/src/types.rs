//! Plugin metadata and host-facing property descriptions

use serde::{Deserialize, Serialize};

use crate::property::ObservableProperty;
use crate::value::{PropertyType, PropertyValue};

/// Plugin manifest containing metadata about the plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin name (identification, config directory, default logger name)
    pub name: String,
    /// Plugin version (semver)
    pub version: String,
    /// API version this plugin was built against
    pub api_version: u32,
    /// Human-readable description
    pub description: String,
    /// Plugin author
    pub author: String,
    /// Names of the events this plugin can raise
    #[serde(default)]
    pub events: Vec<String>,
}

impl Default for PluginManifest {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: "0.0.1".to_string(),
            api_version: crate::API_VERSION,
            description: String::new(),
            author: String::new(),
            events: Vec::new(),
        }
    }
}

/// A property as the host sees it: name, declared type and current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub declared_type: PropertyType,
    pub value: PropertyValue,
}

impl From<&ObservableProperty> for PropertyDescriptor {
    fn from(property: &ObservableProperty) -> Self {
        Self {
            name: property.name().to_string(),
            declared_type: property.declared_type(),
            value: property.value(),
        }
    }
}
