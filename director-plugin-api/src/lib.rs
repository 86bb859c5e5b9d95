//! director-plugin-api - Plugin API for embedding visual plugins in Director
//!
//! A plugin keeps its state in [`ObservableProperty`] cells. The
//! [`PluginAdapter`] owns those cells, drives the plugin's lifecycle hooks
//! and re-syncs every embedded view whenever a property changes. Views write
//! user edits straight back into the properties, and each property's
//! reentrancy guard keeps that round trip from looping.
//!
//! # Example
//!
//! ```ignore
//! use director_plugin_api::{
//!     ObservableProperty, Plugin, PluginContext, PluginError, PluginManifest, ViewBinder,
//! };
//!
//! #[derive(Default)]
//! pub struct VolumePlugin;
//!
//! impl ViewBinder for VolumePlugin {
//!     type View = VolumeView;
//!
//!     fn create_view(&self, _ctx: &PluginContext) -> Result<VolumeView, PluginError> {
//!         Ok(VolumeView::default())
//!     }
//!
//!     fn sync(&self, view: &VolumeView, ctx: &PluginContext) -> Result<(), PluginError> {
//!         view.show(ctx.get("Volume")?);
//!         Ok(())
//!     }
//! }
//!
//! impl Plugin for VolumePlugin {
//!     fn manifest(&self) -> PluginManifest {
//!         PluginManifest {
//!             name: "volume".to_string(),
//!             ..Default::default()
//!         }
//!     }
//!
//!     fn property_definitions(&self) -> Vec<ObservableProperty> {
//!         vec![ObservableProperty::new("Volume", 0.5)]
//!     }
//! }
//! ```

pub mod adapter;
pub mod context;
pub mod error;
pub mod log;
pub mod observer;
pub mod property;
pub mod types;
pub mod value;
pub mod view;

pub use adapter::{AdapterState, DefineProperties, PluginAdapter};
pub use context::{PluginConfig, PluginContext, PropertyMap};
pub use error::PluginError;
pub use log::{DirectorLogLevel, LogSink, TracingLogSink};
pub use observer::{Observers, SubscriptionId};
pub use property::{ObservableProperty, PropertyChange, SetOutcome, SharedProperty};
pub use types::*;
pub use value::{PropertyType, PropertyValue};
pub use view::ViewBinder;

/// Current plugin API version.
pub const API_VERSION: u32 = 1;

/// Logger name used by the default `on_property_changed` hook.
pub const CONTROLLER_LOGGER: &str = "PluginController";

/// The core plugin trait - implement this to create a Director plugin.
///
/// Hooks take `&self`: a plugin's mutable state belongs in its properties,
/// which the adapter shares with the host and the views. Every hook except
/// `manifest` and `property_definitions` has a default.
pub trait Plugin: ViewBinder + 'static {
    /// Return plugin metadata
    fn manifest(&self) -> PluginManifest;

    /// The plugin's properties, in definition order.
    ///
    /// Called once per [`PluginAdapter::define_properties`] call; every call
    /// must produce fresh instances.
    fn property_definitions(&self) -> Vec<ObservableProperty>;

    /// Setup that must run before the host wires the adapter.
    fn initialize_early(&self, _ctx: &PluginContext) -> Result<(), PluginError> {
        Ok(())
    }

    /// Setup that needs the defined properties, such as subscribing to them.
    fn initialize_late(&self, _ctx: &PluginContext) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called for every property change, after all views were synced.
    fn on_property_value_changed(
        &self,
        _change: &PropertyChange<'_>,
        _ctx: &PluginContext,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called after the host changed a property from outside the plugin
    /// (a configuration page, say). The property already holds `value`.
    fn on_property_changed(&self, name: &str, value: &PropertyValue, ctx: &PluginContext) {
        ctx.log(
            CONTROLLER_LOGGER,
            DirectorLogLevel::Debug,
            &format!("Property '{name}' changed to value '{value}'"),
        );
    }

    /// Finalize the plugin. Runs once, from [`PluginAdapter::dispose`].
    fn dispose(&self, _ctx: &PluginContext) -> Result<(), PluginError> {
        Ok(())
    }
}
