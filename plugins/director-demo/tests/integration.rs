//! Integration tests for the demo plugin
//!
//! These drive the plugin the way Director does:
//! - Early init, property definition, late init
//! - Attaching views and syncing them
//! - User edits flowing back through the properties to every view
//! - Host-side property changes, logging and disposal

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use director_demo::{BOOL_PROPERTY, DOUBLE_PROPERTY, DemoPlugin, STRING_PROPERTY};
use director_plugin_api::{
    AdapterState, DirectorLogLevel, PluginAdapter, PluginError, PropertyValue, SetOutcome,
};
use tempfile::TempDir;

type Captured = Rc<RefCell<Vec<(String, i32, String)>>>;

/// Host wiring: early init, define, subscribe the log, late init.
fn host() -> (PluginAdapter<DemoPlugin>, Captured) {
    let adapter = PluginAdapter::new(DemoPlugin);
    adapter.initialize_early().unwrap();

    let defined: Vec<_> = adapter
        .define_properties()
        .unwrap()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(defined, vec![STRING_PROPERTY, BOOL_PROPERTY, DOUBLE_PROPERTY]);

    let captured: Captured = Rc::new(RefCell::new(Vec::new()));
    let sink = captured.clone();
    adapter.subscribe_log(move |logger, level, message| {
        sink.borrow_mut()
            .push((logger.to_string(), level, message.to_string()));
    });

    adapter.initialize_late().unwrap();
    (adapter, captured)
}

fn count_changes(adapter: &PluginAdapter<DemoPlugin>, name: &str) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    adapter.property(name).unwrap().on_change(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });
    count
}

#[test]
fn test_first_display_shows_property_values() {
    let (adapter, captured) = host();
    let view = adapter.get_view().unwrap();
    adapter.update_view(&view).unwrap();

    assert_eq!(view.text_box.value(), "Initial value");
    assert!(view.check_box.value());
    assert_eq!(view.slider.value(), 50.0);

    // Late init logged through the host sink under the plugin's name
    assert_eq!(
        captured.borrow()[0],
        (
            "demo".to_string(),
            DirectorLogLevel::Info.code(),
            "Demo plugin ready with 3 properties".to_string()
        )
    );
}

#[test]
fn test_first_sync_echo_does_not_notify() {
    let (adapter, _) = host();
    let changes = count_changes(&adapter, STRING_PROPERTY);

    let view = adapter.get_view().unwrap();
    adapter.update_view(&view).unwrap();

    // The text box echoes "Initial value" back, which equals the property
    assert_eq!(changes.get(), 0);
}

#[test]
fn test_user_edit_reaches_every_view_once() {
    let (adapter, _) = host();
    let first = adapter.get_view().unwrap();
    let second = adapter.get_view().unwrap();
    adapter.update_views().unwrap();

    let changes = count_changes(&adapter, STRING_PROPERTY);

    first.text_box.set("typed by user".to_string()).unwrap();

    assert_eq!(changes.get(), 1);
    assert_eq!(
        adapter.property(STRING_PROPERTY).unwrap().value(),
        PropertyValue::from("typed by user")
    );
    assert_eq!(second.text_box.value(), "typed by user");
}

#[test]
fn test_checkbox_toggle_round_trip() {
    let (adapter, _) = host();
    let view = adapter.get_view().unwrap();
    adapter.update_view(&view).unwrap();
    let changes = count_changes(&adapter, BOOL_PROPERTY);

    view.check_box.set(false).unwrap();
    view.check_box.set(true).unwrap();

    assert_eq!(changes.get(), 2);
    assert_eq!(
        adapter.property(BOOL_PROPERTY).unwrap().value(),
        PropertyValue::Bool(true)
    );
}

#[test]
fn test_host_change_is_logged_and_synced() {
    let (adapter, captured) = host();
    let view = adapter.get_view().unwrap();
    adapter.update_view(&view).unwrap();
    captured.borrow_mut().clear();

    let outcome = adapter
        .property_value_changed(DOUBLE_PROPERTY, 75.5)
        .unwrap();

    assert_eq!(outcome, SetOutcome::Changed);
    assert_eq!(view.slider.value(), 75.5);
    assert_eq!(
        *captured.borrow(),
        vec![(
            "PluginController".to_string(),
            DirectorLogLevel::Debug.code(),
            "Property 'DoubleProperty' changed to value '75.5'".to_string()
        )]
    );
}

#[test]
fn test_slider_clamp_write_back_is_suppressed() {
    let (adapter, _) = host();
    let view = adapter.get_view().unwrap();
    adapter.update_view(&view).unwrap();
    let changes = count_changes(&adapter, DOUBLE_PROPERTY);

    adapter
        .property_value_changed(DOUBLE_PROPERTY, 150.0)
        .unwrap();

    // The slider clamps to 100 and writes that back while the property is
    // still notifying, so the write-back is dropped
    assert_eq!(view.slider.value(), 100.0);
    assert_eq!(
        adapter.property(DOUBLE_PROPERTY).unwrap().value(),
        PropertyValue::Double(150.0)
    );
    assert_eq!(changes.get(), 1);
}

#[test]
fn test_host_type_mismatch_leaves_views_untouched() {
    let (adapter, captured) = host();
    let view = adapter.get_view().unwrap();
    adapter.update_view(&view).unwrap();
    captured.borrow_mut().clear();

    let err = adapter
        .property_value_changed(BOOL_PROPERTY, "yes")
        .unwrap_err();

    assert!(matches!(err, PluginError::TypeMismatch { .. }));
    assert!(view.check_box.value());
    assert!(captured.borrow().is_empty());
}

#[test]
fn test_null_string_renders_empty() {
    let (adapter, _) = host();
    let view = adapter.get_view().unwrap();
    adapter.update_view(&view).unwrap();

    adapter
        .property(STRING_PROPERTY)
        .unwrap()
        .set(PropertyValue::Null)
        .unwrap();

    assert_eq!(view.text_box.value(), "");
    // The empty echo from the text box was dropped by the guard
    assert!(adapter.property(STRING_PROPERTY).unwrap().value().is_null());
}

#[test]
fn test_views_bound_once_each() {
    let (adapter, _) = host();
    let view = adapter.get_view().unwrap();

    adapter.update_view(&view).unwrap();
    adapter.update_views().unwrap();
    adapter.update_views().unwrap();

    assert_eq!(view.text_box.handler_count(), 1);
    assert_eq!(view.check_box.handler_count(), 1);
    assert_eq!(view.slider.handler_count(), 1);
}

#[test]
fn test_config_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("demo").join("config.toml");

    let (adapter, _) = host();
    adapter
        .property_value_changed(STRING_PROPERTY, "saved text")
        .unwrap();
    adapter.property_value_changed(BOOL_PROPERTY, false).unwrap();
    adapter.save_config(&path).unwrap();
    adapter.dispose().unwrap();

    let (restarted, _) = host();
    let view = restarted.get_view().unwrap();
    let changed = restarted.load_config(&path).unwrap();

    assert_eq!(changed, 2);
    assert_eq!(view.text_box.value(), "saved text");
    assert!(!view.check_box.value());
    assert_eq!(
        restarted.property(DOUBLE_PROPERTY).unwrap().value(),
        PropertyValue::Double(50.0)
    );
}

#[test]
fn test_dispose_once_then_invalid_state() {
    let (adapter, captured) = host();
    adapter.get_view().unwrap();
    captured.borrow_mut().clear();

    adapter.dispose().unwrap();
    assert_eq!(adapter.state(), AdapterState::Disposed);
    assert!(adapter.dispose().is_err());
    assert!(adapter.get_view().is_err());

    let disposed_logs = captured
        .borrow()
        .iter()
        .filter(|(_, _, message)| message == "Demo plugin disposed")
        .count();
    assert_eq!(disposed_logs, 1);
}

#[test]
fn test_events_from_manifest() {
    let adapter = PluginAdapter::new(DemoPlugin);
    assert_eq!(adapter.events(), ["Event1".to_string(), "Event2".to_string()]);
}
