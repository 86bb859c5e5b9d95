//! The view contract between a plugin and the host's embedding sites

use crate::context::PluginContext;
use crate::error::PluginError;

/// How a plugin builds and refreshes its views.
///
/// A plugin can be embedded in several host pages at once, so the adapter
/// may hold many views of the same plugin. Each view is created and bound
/// once, then synced every time a property changes.
pub trait ViewBinder {
    /// The plugin's concrete view type
    type View: 'static;

    /// Build a fresh view for a new embedding site.
    fn create_view(&self, ctx: &PluginContext) -> Result<Self::View, PluginError>;

    /// Wire the view's user-edit callbacks to write back into properties.
    ///
    /// Called exactly once per view, right after `create_view`.
    fn bind(&self, _view: &Self::View, _ctx: &PluginContext) -> Result<(), PluginError> {
        Ok(())
    }

    /// Bring the view's widgets in line with the current property values.
    fn sync(&self, view: &Self::View, ctx: &PluginContext) -> Result<(), PluginError>;
}
