//! Minimal widget state cells standing in for host-rendered controls

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use director_plugin_api::{Observers, PluginError, SubscriptionId};

type ChangedHandler<T> = dyn Fn(&T) -> Result<(), PluginError>;

/// A control holding one value and raising `changed` whenever it differs
/// from the previous one, whether the user edited it or code assigned it.
///
/// That is how toolkit text boxes and sliders behave, and it is why syncing
/// a view from a property immediately echoes the value back.
pub struct Widget<T> {
    value: RefCell<T>,
    changed: Observers<ChangedHandler<T>>,
}

impl<T: Clone + PartialEq + 'static> Widget<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            changed: Observers::new(),
        }
    }

    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Assign a value, raising `changed` if it differs.
    pub fn set(&self, value: T) -> Result<(), PluginError> {
        if *self.value.borrow() == value {
            return Ok(());
        }
        self.value.replace(value.clone());
        for handler in self.changed.snapshot() {
            handler(&value)?;
        }
        Ok(())
    }

    pub fn on_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) -> Result<(), PluginError> + 'static,
    {
        self.changed.subscribe(Rc::new(handler))
    }

    pub fn handler_count(&self) -> usize {
        self.changed.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Widget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("value", &*self.value.borrow())
            .field("handlers", &self.changed.len())
            .finish()
    }
}

/// A slider that clamps into `[min, max]`.
#[derive(Debug)]
pub struct Slider {
    widget: Widget<f64>,
    min: f64,
    max: f64,
}

impl Slider {
    /// Fails unless both bounds are numbers and `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, PluginError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(PluginError::view(format!(
                "invalid slider range {min}..{max}"
            )));
        }
        Ok(Self {
            widget: Widget::new(min),
            min,
            max,
        })
    }

    pub fn value(&self) -> f64 {
        self.widget.value()
    }

    pub fn set(&self, value: f64) -> Result<(), PluginError> {
        self.widget.set(value.clamp(self.min, self.max))
    }

    pub fn on_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&f64) -> Result<(), PluginError> + 'static,
    {
        self.widget.on_changed(handler)
    }

    pub fn handler_count(&self) -> usize {
        self.widget.handler_count()
    }
}
