//! Demo Plugin - the reference plugin for Director
//!
//! This plugin demonstrates:
//! - Defining typed properties (`property_definitions`)
//! - Building a view and wiring its controls back into the properties (`bind`)
//! - Refreshing every embedded view when a property changes (`sync`)
//! - Logging through the host's sinks
//!
//! Its view is three controls: a text box bound to `StringProperty`, a check
//! box bound to `BoolProperty` and a slider bound to `DoubleProperty`.

pub mod widget;

use director_plugin_api::{
    ObservableProperty, Plugin, PluginContext, PluginError, PluginManifest, PropertyValue,
    SharedProperty, ViewBinder,
};

pub use widget::{Slider, Widget};

pub const STRING_PROPERTY: &str = "StringProperty";
pub const BOOL_PROPERTY: &str = "BoolProperty";
pub const DOUBLE_PROPERTY: &str = "DoubleProperty";

/// Slider range shown by the demo view
pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 100.0;

/// The demo plugin's view: one control per property.
#[derive(Debug)]
pub struct DemoView {
    pub text_box: Widget<String>,
    pub check_box: Widget<bool>,
    pub slider: Slider,
}

impl DemoView {
    fn new() -> Result<Self, PluginError> {
        Ok(Self {
            text_box: Widget::new(String::new()),
            check_box: Widget::new(false),
            slider: Slider::new(SLIDER_MIN, SLIDER_MAX)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct DemoPlugin;

impl ViewBinder for DemoPlugin {
    type View = DemoView;

    fn create_view(&self, _ctx: &PluginContext) -> Result<DemoView, PluginError> {
        DemoView::new()
    }

    fn bind(&self, view: &DemoView, ctx: &PluginContext) -> Result<(), PluginError> {
        let text = require(ctx, STRING_PROPERTY)?;
        view.text_box.on_changed(move |value: &String| {
            text.set(value.as_str())?;
            Ok(())
        });

        let flag = require(ctx, BOOL_PROPERTY)?;
        view.check_box.on_changed(move |value: &bool| {
            flag.set(*value)?;
            Ok(())
        });

        let level = require(ctx, DOUBLE_PROPERTY)?;
        view.slider.on_changed(move |value: &f64| {
            level.set(*value)?;
            Ok(())
        });

        Ok(())
    }

    fn sync(&self, view: &DemoView, ctx: &PluginContext) -> Result<(), PluginError> {
        let text = match ctx.get(STRING_PROPERTY)? {
            PropertyValue::String(s) => s,
            PropertyValue::Null => String::new(),
            other => return Err(unexpected(STRING_PROPERTY, &other)),
        };
        view.text_box.set(text)?;

        let checked = ctx.get(BOOL_PROPERTY)?;
        let checked = checked
            .as_bool()
            .ok_or_else(|| unexpected(BOOL_PROPERTY, &checked))?;
        view.check_box.set(checked)?;

        let level = ctx.get(DOUBLE_PROPERTY)?;
        let level = level
            .as_f64()
            .ok_or_else(|| unexpected(DOUBLE_PROPERTY, &level))?;
        view.slider.set(level)?;

        Ok(())
    }
}

impl Plugin for DemoPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            name: "demo".to_string(),
            version: "0.1.0".to_string(),
            description: "Text, toggle and slider bound to observable properties".to_string(),
            author: "director-team".to_string(),
            events: vec!["Event1".to_string(), "Event2".to_string()],
            ..Default::default()
        }
    }

    fn property_definitions(&self) -> Vec<ObservableProperty> {
        vec![
            ObservableProperty::new(STRING_PROPERTY, "Initial value"),
            ObservableProperty::new(BOOL_PROPERTY, true),
            ObservableProperty::new(DOUBLE_PROPERTY, 50.0),
        ]
    }

    fn initialize_late(&self, ctx: &PluginContext) -> Result<(), PluginError> {
        ctx.log_info(&format!(
            "Demo plugin ready with {} properties",
            ctx.property_names().len()
        ));
        Ok(())
    }

    fn dispose(&self, ctx: &PluginContext) -> Result<(), PluginError> {
        ctx.log_debug("Demo plugin disposed");
        Ok(())
    }
}

fn require(
    ctx: &PluginContext,
    name: &str,
) -> Result<SharedProperty, PluginError> {
    ctx.property(name)
        .ok_or_else(|| PluginError::UnknownProperty(name.to_string()))
}

fn unexpected(name: &str, value: &PropertyValue) -> PluginError {
    tracing::warn!(property = %name, kind = value.kind(), "Demo view cannot display value");
    PluginError::view(format!("{name} holds a {} value", value.kind()))
}
