//! PluginContext - a plugin's handle onto its own properties and the host log

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::PluginError;
use crate::log::{DirectorLogLevel, LogSink, TracingLogSink};
use crate::observer::{Observers, SubscriptionId};
use crate::property::{SetOutcome, SharedProperty};
use crate::value::PropertyValue;

/// Properties keyed by name. Iteration order is unspecified.
pub type PropertyMap = HashMap<String, SharedProperty>;

/// Plugin's interface to the adapter that hosts it.
///
/// Passed to every [`Plugin`](crate::Plugin) hook. It gives access to:
/// - the registered properties (read, write, look up by name)
/// - the host log, through the subscribed log sinks
///
/// Cloning is cheap; all clones see the same properties and sinks.
#[derive(Clone)]
pub struct PluginContext {
    plugin_name: Rc<str>,
    properties: Rc<RefCell<PropertyMap>>,
    log_sinks: Rc<Observers<LogSink>>,
}

impl PluginContext {
    /// Create a context with no properties and no log sinks
    pub fn new(plugin_name: impl Into<String>) -> Self {
        let plugin_name: String = plugin_name.into();
        Self {
            plugin_name: Rc::from(plugin_name),
            properties: Rc::new(RefCell::new(HashMap::new())),
            log_sinks: Rc::new(Observers::new()),
        }
    }

    /// Get the plugin's name
    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    // ─── Properties ──────────────────────────────────────────────────

    /// Register a property, replacing any earlier property with the same name.
    ///
    /// Returns the replaced property, if any.
    pub(crate) fn register(&self, property: SharedProperty) -> Option<SharedProperty> {
        self.properties
            .borrow_mut()
            .insert(property.name().to_string(), property)
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<SharedProperty> {
        self.properties.borrow().get(name).cloned()
    }

    /// Snapshot of all registered properties
    pub fn properties(&self) -> PropertyMap {
        self.properties.borrow().clone()
    }

    /// Names of all registered properties, sorted
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.properties.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Current value of a named property
    pub fn get(&self, name: &str) -> Result<PropertyValue, PluginError> {
        self.require(name).map(|p| p.value())
    }

    /// Assign a named property.
    ///
    /// The map is not borrowed while listeners run, so listeners and views
    /// are free to read other properties.
    pub fn set(
        &self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<SetOutcome, PluginError> {
        self.require(name)?.set(value)
    }

    fn require(&self, name: &str) -> Result<SharedProperty, PluginError> {
        self.property(name)
            .ok_or_else(|| PluginError::UnknownProperty(name.to_string()))
    }

    // ─── Logging ─────────────────────────────────────────────────────

    /// Subscribe a host log sink. Sinks are called in subscription order.
    pub fn subscribe_log<F>(&self, sink: F) -> SubscriptionId
    where
        F: Fn(&str, i32, &str) + 'static,
    {
        self.log_sinks.subscribe(Rc::new(sink))
    }

    /// Remove a host log sink
    pub fn unsubscribe_log(&self, id: SubscriptionId) -> bool {
        self.log_sinks.unsubscribe(id)
    }

    /// Forward a log request to every subscribed sink.
    ///
    /// With no sink subscribed the request goes to `tracing` instead of
    /// being lost.
    pub fn log(&self, logger: &str, level: DirectorLogLevel, message: &str) {
        let sinks = self.log_sinks.snapshot();
        if sinks.is_empty() {
            TracingLogSink.emit(logger, level.code(), message);
            return;
        }
        for sink in sinks {
            sink(logger, level.code(), message);
        }
    }

    /// Log an info message under the plugin's own logger name
    pub fn log_info(&self, message: &str) {
        self.log(&self.plugin_name, DirectorLogLevel::Info, message);
    }

    /// Log a warning message
    pub fn log_warn(&self, message: &str) {
        self.log(&self.plugin_name, DirectorLogLevel::Warn, message);
    }

    /// Log an error message
    pub fn log_error(&self, message: &str) {
        self.log(&self.plugin_name, DirectorLogLevel::Error, message);
    }

    /// Log a debug message
    pub fn log_debug(&self, message: &str) {
        self.log(&self.plugin_name, DirectorLogLevel::Debug, message);
    }
}

/// Plugin configuration - persistent key-value store backed by TOML
#[derive(Debug)]
pub struct PluginConfig {
    values: HashMap<String, toml::Value>,
    dirty: bool,
}

impl PluginConfig {
    /// Create a new empty config
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            dirty: false,
        }
    }

    /// Load configuration from a TOML file; a missing file yields an empty config
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let values: HashMap<String, toml::Value> =
            toml::from_str(&content).map_err(|e| PluginError::Config(e.to_string()))?;
        Ok(Self {
            values,
            dirty: false,
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&mut self, path: &Path) -> Result<(), PluginError> {
        let content = toml::to_string_pretty(&self.values)
            .map_err(|e| PluginError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        self.dirty = false;
        Ok(())
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(|v| v.clone().try_into().ok())
    }

    /// Set a configuration value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), PluginError> {
        let toml_value =
            toml::Value::try_from(value).map_err(|e| PluginError::Serialization(e.to_string()))?;
        self.set_raw(key, toml_value);
        Ok(())
    }

    /// Raw TOML value for a key
    pub fn get_raw(&self, key: &str) -> Option<&toml::Value> {
        self.values.get(key)
    }

    /// Store a raw TOML value
    pub fn set_raw(&mut self, key: &str, value: toml::Value) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if the config has been modified since loading/saving
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the config as clean
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self::new()
    }
}
