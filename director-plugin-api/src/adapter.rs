//! PluginAdapter - owns a plugin's properties and keeps its views in sync
//!
//! Lifecycle, driven by the host:
//!
//! ```text
//! Constructed -> EarlyInitialized -> PropertiesDefined -> Running -> Disposed
//!   initialize_early()   define_properties()   initialize_late()   dispose()
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use uuid::Uuid;

use crate::Plugin;
use crate::context::{PluginConfig, PluginContext, PropertyMap};
use crate::error::PluginError;
use crate::log::DirectorLogLevel;
use crate::observer::SubscriptionId;
use crate::property::{ObservableProperty, PropertyChange, SetOutcome, SharedProperty};
use crate::types::{PluginManifest, PropertyDescriptor};
use crate::value::PropertyValue;

/// Lifecycle state of an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Constructed,
    EarlyInitialized,
    PropertiesDefined,
    Running,
    Disposed,
}

impl AdapterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterState::Constructed => "constructed",
            AdapterState::EarlyInitialized => "early-initialized",
            AdapterState::PropertiesDefined => "properties-defined",
            AdapterState::Running => "running",
            AdapterState::Disposed => "disposed",
        }
    }
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Shared<P: Plugin> {
    plugin: P,
    manifest: PluginManifest,
    ctx: PluginContext,
    views: RefCell<Vec<Rc<P::View>>>,
    state: Cell<AdapterState>,
    instance_id: Uuid,
}

impl<P: Plugin> Shared<P> {
    fn require(
        &self,
        operation: &'static str,
        allowed: &[AdapterState],
    ) -> Result<AdapterState, PluginError> {
        let state = self.state.get();
        if allowed.contains(&state) {
            Ok(state)
        } else {
            Err(PluginError::InvalidState {
                operation,
                state: state.as_str(),
            })
        }
    }

    fn transition(&self, to: AdapterState) {
        let from = self.state.replace(to);
        tracing::debug!(
            plugin = %self.manifest.name,
            instance = %self.instance_id,
            from = %from,
            to = %to,
            "Adapter state changed"
        );
    }

    fn update_views(&self) -> Result<(), PluginError> {
        let views: Vec<_> = self.views.borrow().clone();
        for view in views {
            self.plugin.sync(&view, &self.ctx)?;
        }
        Ok(())
    }

    /// Change handler subscribed to every defined property.
    fn handle_change(&self, change: &PropertyChange<'_>) -> Result<(), PluginError> {
        match self.state.get() {
            AdapterState::Disposed => return Ok(()),
            AdapterState::Running => self.update_views()?,
            _ => {}
        }
        self.plugin.on_property_value_changed(change, &self.ctx)
    }
}

/// Hosts a plugin: drives its lifecycle hooks, owns its properties, tracks
/// its views and forwards its log requests.
///
/// Single-threaded; views and properties are shared through `Rc`.
pub struct PluginAdapter<P: Plugin> {
    shared: Rc<Shared<P>>,
}

impl<P: Plugin> PluginAdapter<P> {
    pub fn new(plugin: P) -> Self {
        let manifest = plugin.manifest();
        let ctx = PluginContext::new(manifest.name.clone());
        Self {
            shared: Rc::new(Shared {
                plugin,
                manifest,
                ctx,
                views: RefCell::new(Vec::new()),
                state: Cell::new(AdapterState::Constructed),
                instance_id: Uuid::new_v4(),
            }),
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────

    /// Run the plugin's own setup, before the host wires anything.
    pub fn initialize_early(&self) -> Result<(), PluginError> {
        let shared = &self.shared;
        shared.require("initialize early", &[AdapterState::Constructed])?;
        shared.plugin.initialize_early(&shared.ctx)?;
        shared.transition(AdapterState::EarlyInitialized);
        Ok(())
    }

    /// Enumerate the plugin's properties, registering each one as it is yielded.
    ///
    /// Every call asks the plugin for a fresh set of definitions. A second
    /// call leaves earlier entries in place; a property with a name seen
    /// before replaces the earlier one in the map, while the replaced
    /// instance keeps its subscriptions. Hosts call this once.
    pub fn define_properties(&self) -> Result<DefineProperties<'_, P>, PluginError> {
        let shared = &self.shared;
        let state = shared.require(
            "define properties",
            &[
                AdapterState::EarlyInitialized,
                AdapterState::PropertiesDefined,
                AdapterState::Running,
            ],
        )?;
        if state == AdapterState::EarlyInitialized {
            shared.transition(AdapterState::PropertiesDefined);
        }
        Ok(DefineProperties {
            adapter: self,
            pending: shared.plugin.property_definitions().into_iter(),
        })
    }

    /// Run the plugin's post-wiring setup (binding to its own properties).
    pub fn initialize_late(&self) -> Result<(), PluginError> {
        let shared = &self.shared;
        shared.require("initialize late", &[AdapterState::PropertiesDefined])?;
        shared.plugin.initialize_late(&shared.ctx)?;
        shared.transition(AdapterState::Running);
        Ok(())
    }

    /// Run the plugin's finalize hook.
    ///
    /// The hook runs exactly once; calling `dispose` again fails with
    /// [`PluginError::InvalidState`]. Tracked views are released.
    pub fn dispose(&self) -> Result<(), PluginError> {
        let shared = &self.shared;
        if shared.state.get() == AdapterState::Disposed {
            return Err(PluginError::InvalidState {
                operation: "dispose",
                state: AdapterState::Disposed.as_str(),
            });
        }
        shared.transition(AdapterState::Disposed);
        shared.views.borrow_mut().clear();
        shared.plugin.dispose(&shared.ctx)
    }

    // ─── Views ───────────────────────────────────────────────────────

    /// Create, bind and start tracking a view for a new embedding site.
    pub fn get_view(&self) -> Result<Rc<P::View>, PluginError> {
        let shared = &self.shared;
        shared.require("create a view", &[AdapterState::Running])?;

        let view = shared.plugin.create_view(&shared.ctx)?;
        shared.plugin.bind(&view, &shared.ctx)?;
        let view = Rc::new(view);

        let count = {
            let mut views = shared.views.borrow_mut();
            views.push(view.clone());
            views.len()
        };
        tracing::debug!(
            plugin = %shared.manifest.name,
            instance = %shared.instance_id,
            views = count,
            "View attached"
        );
        Ok(view)
    }

    /// Sync one view with the current property values.
    pub fn update_view(&self, view: &P::View) -> Result<(), PluginError> {
        let shared = &self.shared;
        shared.require("update a view", &[AdapterState::Running])?;
        shared.plugin.sync(view, &shared.ctx)
    }

    /// Sync every tracked view, in the order they were created.
    pub fn update_views(&self) -> Result<(), PluginError> {
        self.shared
            .require("update views", &[AdapterState::Running])?;
        self.shared.update_views()
    }

    /// Tracked views, in creation order
    pub fn views(&self) -> Vec<Rc<P::View>> {
        self.shared.views.borrow().clone()
    }

    pub fn view_count(&self) -> usize {
        self.shared.views.borrow().len()
    }

    // ─── Properties ──────────────────────────────────────────────────

    /// Host entry point for changing a property from outside the plugin.
    ///
    /// Assigns the property, then hands the new value to the plugin's
    /// [`on_property_changed`](Plugin::on_property_changed) hook. The hook
    /// only runs when the value actually changed.
    pub fn property_value_changed(
        &self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<SetOutcome, PluginError> {
        let shared = &self.shared;
        shared.require(
            "change a property",
            &[AdapterState::PropertiesDefined, AdapterState::Running],
        )?;

        let outcome = shared.ctx.set(name, value)?;
        if outcome == SetOutcome::Changed {
            let value = shared.ctx.get(name)?;
            shared.plugin.on_property_changed(name, &value, &shared.ctx);
        }
        Ok(outcome)
    }

    pub fn property(&self, name: &str) -> Option<SharedProperty> {
        self.shared.ctx.property(name)
    }

    pub fn properties(&self) -> PropertyMap {
        self.shared.ctx.properties()
    }

    /// Name, type and value of every property, sorted by name
    pub fn describe_properties(&self) -> Vec<PropertyDescriptor> {
        let mut descriptors: Vec<_> = self
            .shared
            .ctx
            .properties()
            .values()
            .map(|p| PropertyDescriptor::from(&**p))
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    // ─── Logging ─────────────────────────────────────────────────────

    /// Forward a log request to the host's sinks.
    pub fn log(&self, logger: &str, level: DirectorLogLevel, message: &str) {
        self.shared.ctx.log(logger, level, message);
    }

    /// Subscribe a host log sink receiving `(logger, level_code, message)`.
    pub fn subscribe_log<F>(&self, sink: F) -> SubscriptionId
    where
        F: Fn(&str, i32, &str) + 'static,
    {
        self.shared.ctx.subscribe_log(sink)
    }

    pub fn unsubscribe_log(&self, id: SubscriptionId) -> bool {
        self.shared.ctx.unsubscribe_log(id)
    }

    // ─── Configuration ───────────────────────────────────────────────

    /// Default config location for this plugin
    pub fn default_config_path(&self) -> PathBuf {
        director_paths::plugin_config_path(&self.shared.manifest.name)
    }

    /// Apply stored values to matching properties.
    ///
    /// Values go through the normal setter, so listeners and views see them.
    /// Keys without a matching property are skipped. Every value is checked
    /// against its property's type before any is applied, so a bad entry
    /// leaves all properties untouched. Returns how many properties changed.
    pub fn load_config(&self, path: &Path) -> Result<usize, PluginError> {
        let shared = &self.shared;
        let config = PluginConfig::load(path)?;

        let mut pending = Vec::new();
        for key in config.keys() {
            let Some(property) = shared.ctx.property(key) else {
                tracing::warn!(
                    plugin = %shared.manifest.name,
                    key = %key,
                    "Config key has no matching property"
                );
                continue;
            };
            let Some(raw) = config.get_raw(key) else {
                continue;
            };
            let declared_type = property.declared_type();
            let value = PropertyValue::from_toml(raw.clone(), declared_type);
            if !value.is_assignable_to(declared_type) {
                return Err(PluginError::TypeMismatch {
                    property: key.to_string(),
                    expected: declared_type,
                    found: value.kind().to_string(),
                });
            }
            pending.push((property, value));
        }

        let mut changed = 0;
        for (property, value) in pending {
            if property.set(value)? == SetOutcome::Changed {
                changed += 1;
            }
        }

        tracing::debug!(
            plugin = %shared.manifest.name,
            path = %path.display(),
            changed,
            "Config applied"
        );
        Ok(changed)
    }

    /// Persist current property values. Null values are skipped.
    pub fn save_config(&self, path: &Path) -> Result<(), PluginError> {
        let mut config = PluginConfig::new();
        for (name, property) in self.shared.ctx.properties() {
            let value = property
                .value()
                .to_toml()
                .map_err(|e| PluginError::Serialization(e.to_string()))?;
            if let Some(value) = value {
                config.set_raw(&name, value);
            }
        }
        config.save(path)
    }

    // ─── Accessors ───────────────────────────────────────────────────

    pub fn state(&self) -> AdapterState {
        self.shared.state.get()
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.shared.manifest
    }

    /// Names of the events the plugin can raise
    pub fn events(&self) -> &[String] {
        &self.shared.manifest.events
    }

    pub fn plugin(&self) -> &P {
        &self.shared.plugin
    }

    pub fn context(&self) -> &PluginContext {
        &self.shared.ctx
    }

    /// Unique id of this adapter instance, attached to its diagnostics
    pub fn instance_id(&self) -> Uuid {
        self.shared.instance_id
    }

    fn register(&self, property: ObservableProperty) -> SharedProperty {
        let property = Rc::new(property);
        let weak: Weak<Shared<P>> = Rc::downgrade(&self.shared);
        property.on_change(move |change| match weak.upgrade() {
            Some(shared) => shared.handle_change(change),
            None => Ok(()),
        });

        if self.shared.ctx.register(property.clone()).is_some() {
            tracing::debug!(
                plugin = %self.shared.manifest.name,
                property = %property.name(),
                "Property redefined"
            );
        }
        property
    }
}

impl<P: Plugin> Drop for PluginAdapter<P> {
    fn drop(&mut self) {
        if self.shared.state.get() == AdapterState::Disposed {
            return;
        }
        // Give the plugin its finalize hook even if the host never called dispose
        if let Err(e) = self.dispose() {
            tracing::warn!(
                plugin = %self.shared.manifest.name,
                error = %e,
                "Plugin dispose returned error"
            );
        }
    }
}

/// Lazy property enumeration returned by [`PluginAdapter::define_properties`].
///
/// Each property is registered and subscribed when it is yielded; dropping
/// the iterator early leaves the rest undefined.
pub struct DefineProperties<'a, P: Plugin> {
    adapter: &'a PluginAdapter<P>,
    pending: std::vec::IntoIter<ObservableProperty>,
}

impl<P: Plugin> Iterator for DefineProperties<'_, P> {
    type Item = SharedProperty;

    fn next(&mut self) -> Option<Self::Item> {
        let property = self.pending.next()?;
        Some(self.adapter.register(property))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}
