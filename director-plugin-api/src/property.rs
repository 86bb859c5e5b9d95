//! ObservableProperty - a named value cell that notifies on change
//!
//! Listeners run synchronously on the caller's stack. A listener that writes
//! back to the property it is being notified about (a slider handler echoing
//! the value it was just given, say) hits the reentrancy guard and its write
//! is dropped, which is what keeps view feedback loops from storming.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::PluginError;
use crate::observer::{Observers, SubscriptionId};
use crate::value::{PropertyType, PropertyValue};

/// Callback invoked on every value change.
pub type PropertyListener = dyn Fn(&PropertyChange<'_>) -> Result<(), PluginError>;

/// Shared handle to a property; the adapter, its views and plugin code all
/// hold clones of the same cell.
pub type SharedProperty = Rc<ObservableProperty>;

/// A single change notification.
#[derive(Debug)]
pub struct PropertyChange<'a> {
    pub property: &'a ObservableProperty,
    pub old_value: PropertyValue,
    pub new_value: PropertyValue,
}

/// What a call to [`ObservableProperty::set`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Value stored and listeners notified
    Changed,
    /// Value equal to the current one; nothing happened
    Unchanged,
    /// A notification for this property was already running; the write was dropped
    Suppressed,
}

/// Marks a notification as in flight for as long as it is alive.
///
/// Dropping it clears the flag, so the property is released on every exit
/// path out of `set`, including listener errors and panics.
struct NotifyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> NotifyGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// A named, typed, mutable value that notifies listeners when it changes.
pub struct ObservableProperty {
    name: String,
    declared_type: PropertyType,
    value: RefCell<PropertyValue>,
    notifying: Cell<bool>,
    listeners: Observers<PropertyListener>,
}

impl ObservableProperty {
    /// Create a property whose declared type is inferred from `value`.
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let value = value.into();
        let declared_type = value.natural_type();
        Self::build(name.into(), declared_type, value)
    }

    /// Create a property with an explicit declared type.
    ///
    /// Fails if the initial value does not fit the type.
    pub fn with_type(
        name: impl Into<String>,
        declared_type: PropertyType,
        value: impl Into<PropertyValue>,
    ) -> Result<Self, PluginError> {
        let name = name.into();
        let value = value.into();
        if !value.is_assignable_to(declared_type) {
            return Err(PluginError::TypeMismatch {
                property: name,
                expected: declared_type,
                found: value.kind().to_string(),
            });
        }
        Ok(Self::build(name, declared_type, value))
    }

    fn build(name: String, declared_type: PropertyType, value: PropertyValue) -> Self {
        Self {
            name,
            declared_type,
            value: RefCell::new(value),
            notifying: Cell::new(false),
            listeners: Observers::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> PropertyType {
        self.declared_type
    }

    /// Current value (a clone; the cell itself is never borrowed across calls).
    pub fn value(&self) -> PropertyValue {
        self.value.borrow().clone()
    }

    /// Whether a change notification is currently running.
    pub fn is_notifying(&self) -> bool {
        self.notifying.get()
    }

    /// Assign a new value.
    ///
    /// Listeners run in registration order. The first listener error stops
    /// the walk and is returned; the new value stays stored and the property
    /// accepts further writes.
    pub fn set(&self, value: impl Into<PropertyValue>) -> Result<SetOutcome, PluginError> {
        let value = value.into();
        if !value.is_assignable_to(self.declared_type) {
            return Err(PluginError::TypeMismatch {
                property: self.name.clone(),
                expected: self.declared_type,
                found: value.kind().to_string(),
            });
        }

        if *self.value.borrow() == value {
            return Ok(SetOutcome::Unchanged);
        }

        let Some(_guard) = NotifyGuard::acquire(&self.notifying) else {
            tracing::trace!(property = %self.name, value = %value, "Reentrant set dropped");
            return Ok(SetOutcome::Suppressed);
        };

        let old_value = self.value.replace(value.clone());
        let change = PropertyChange {
            property: self,
            old_value,
            new_value: value,
        };

        for listener in self.listeners.snapshot() {
            listener(&change)?;
        }

        Ok(SetOutcome::Changed)
    }

    /// Register a change listener.
    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PropertyChange<'_>) -> Result<(), PluginError> + 'static,
    {
        self.listeners.subscribe(Rc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn off_change(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for ObservableProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("value", &*self.value.borrow())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
