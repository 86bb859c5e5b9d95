//! Integration tests for director-plugin-api
//!
//! These exercise the property and adapter contract end to end:
//! - Notification counts for equal, distinct and reentrant writes
//! - Guard release after listener failures
//! - Property definition and view fan-out through the adapter

use std::cell::RefCell;
use std::rc::Rc;

use director_plugin_api::{
    ObservableProperty, Plugin, PluginAdapter, PluginContext, PluginError, PluginManifest,
    PropertyValue, SetOutcome, ViewBinder,
};

type Notifications = Rc<RefCell<Vec<(PropertyValue, PropertyValue)>>>;

fn record(property: &ObservableProperty) -> Notifications {
    let seen: Notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    property.on_change(move |change| {
        sink.borrow_mut()
            .push((change.old_value.clone(), change.new_value.clone()));
        Ok(())
    });
    seen
}

#[test]
fn test_a_b_c_scenario() {
    let p = ObservableProperty::new("P", "a");
    let seen = record(&p);

    assert_eq!(p.set("a").unwrap(), SetOutcome::Unchanged);
    assert!(seen.borrow().is_empty());

    assert_eq!(p.set("b").unwrap(), SetOutcome::Changed);
    assert_eq!(
        *seen.borrow(),
        vec![(PropertyValue::from("a"), PropertyValue::from("b"))]
    );

    // A listener that writes "c" from inside its own notification
    let q = ObservableProperty::new("Q", "a");
    let q_seen = record(&q);
    q.on_change(|change| {
        change.property.set("c")?;
        Ok(())
    });

    q.set("b").unwrap();
    assert_eq!(q.value(), PropertyValue::from("b"));
    assert_eq!(q_seen.borrow().len(), 1);
}

#[test]
fn test_distinct_values_each_notify_once() {
    let p = ObservableProperty::new("Count", 0i64);
    let seen = record(&p);

    for i in 1..=5i64 {
        p.set(i).unwrap();
        p.set(i).unwrap();
    }

    let news: Vec<_> = seen.borrow().iter().map(|(_, new)| new.clone()).collect();
    assert_eq!(news, (1..=5i64).map(PropertyValue::Int).collect::<Vec<_>>());
    let olds: Vec<_> = seen.borrow().iter().map(|(old, _)| old.clone()).collect();
    assert_eq!(olds, (0..5i64).map(PropertyValue::Int).collect::<Vec<_>>());
}

#[test]
fn test_property_usable_after_failed_notification() {
    let p = ObservableProperty::new("P", "start");
    p.on_change(|change| {
        if change.new_value == PropertyValue::from("bad") {
            return Err(PluginError::custom("rejected"));
        }
        Ok(())
    });
    let seen = record(&p);

    assert!(p.set("bad").is_err());
    assert!(!p.is_notifying());

    assert_eq!(p.set("good").unwrap(), SetOutcome::Changed);
    assert_eq!(
        seen.borrow().last().cloned(),
        Some((PropertyValue::from("bad"), PropertyValue::from("good")))
    );
}

// ─── Adapter ─────────────────────────────────────────────────────────

/// Records view syncs into a shared journal
#[derive(Default)]
struct JournalPlugin {
    journal: Rc<RefCell<Vec<String>>>,
}

struct JournalView {
    label: String,
}

impl ViewBinder for JournalPlugin {
    type View = JournalView;

    fn create_view(&self, ctx: &PluginContext) -> Result<JournalView, PluginError> {
        let label = format!("view-{}", self.journal.borrow().len());
        self.journal
            .borrow_mut()
            .push(format!("create {label} for {}", ctx.plugin_name()));
        Ok(JournalView { label })
    }

    fn sync(&self, view: &JournalView, ctx: &PluginContext) -> Result<(), PluginError> {
        let title = ctx.get("Title")?;
        self.journal
            .borrow_mut()
            .push(format!("sync {} = {title}", view.label));
        Ok(())
    }
}

impl Plugin for JournalPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            name: "journal".to_string(),
            ..Default::default()
        }
    }

    fn property_definitions(&self) -> Vec<ObservableProperty> {
        vec![
            ObservableProperty::new("Title", "untitled"),
            ObservableProperty::new("Zoom", 1.0),
        ]
    }
}

fn running(plugin: JournalPlugin) -> PluginAdapter<JournalPlugin> {
    let adapter = PluginAdapter::new(plugin);
    adapter.initialize_early().unwrap();
    adapter.define_properties().unwrap().for_each(drop);
    adapter.initialize_late().unwrap();
    adapter
}

#[test]
fn test_two_views_updated_in_insertion_order() {
    let journal = Rc::new(RefCell::new(Vec::new()));
    let adapter = running(JournalPlugin {
        journal: journal.clone(),
    });

    adapter.get_view().unwrap();
    adapter.get_view().unwrap();
    journal.borrow_mut().clear();

    adapter.property("Zoom").unwrap().set(2.0).unwrap();

    assert_eq!(
        *journal.borrow(),
        vec!["sync view-0 = untitled", "sync view-1 = untitled"]
    );
}

#[test]
fn test_define_properties_populates_map_by_name() {
    let adapter = PluginAdapter::new(JournalPlugin::default());
    adapter.initialize_early().unwrap();

    let yielded: Vec<_> = adapter.define_properties().unwrap().collect();
    let map = adapter.properties();

    assert_eq!(map.len(), yielded.len());
    for property in &yielded {
        assert!(Rc::ptr_eq(&map[property.name()], property));
    }

    // A second pass keeps every name present
    let again: Vec<_> = adapter.define_properties().unwrap().collect();
    assert_eq!(again.len(), 2);
    assert_eq!(adapter.properties().len(), 2);
    assert!(adapter.property("Title").is_some());
    assert!(adapter.property("Zoom").is_some());
}

#[test]
fn test_sync_failure_propagates_to_setter() {
    struct Broken;

    impl ViewBinder for Broken {
        type View = ();

        fn create_view(&self, _ctx: &PluginContext) -> Result<(), PluginError> {
            Ok(())
        }

        fn sync(&self, _view: &(), _ctx: &PluginContext) -> Result<(), PluginError> {
            Err(PluginError::view("renderer gone"))
        }
    }

    impl Plugin for Broken {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::default()
        }

        fn property_definitions(&self) -> Vec<ObservableProperty> {
            vec![ObservableProperty::new("Value", 0i64)]
        }
    }

    let adapter = PluginAdapter::new(Broken);
    adapter.initialize_early().unwrap();
    adapter.define_properties().unwrap().for_each(drop);
    adapter.initialize_late().unwrap();
    adapter.get_view().unwrap();

    let value = adapter.property("Value").unwrap();
    let err = value.set(1i64).unwrap_err();
    assert!(matches!(err, PluginError::View(_)));

    // Stored anyway, and the guard is free for the next write
    assert_eq!(value.value(), PropertyValue::Int(1));
    assert!(!value.is_notifying());
}
