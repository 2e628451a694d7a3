use crate::core::event::{Event, SubscriptionId};
use crate::domain::ports::PropertyNotifier;

/// Payload of a property-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanged {
    pub name: String,
}

/// A named string value that notifies observers whenever it changes.
#[derive(Debug)]
pub struct NamedProperty {
    name: String,
    value: Option<String>,
    changed: Event<PropertyChanged>,
}

impl NamedProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            changed: Event::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Stores `new_value` and notifies observers, unless it equals the current value.
    /// Returns whether the value changed.
    pub fn set_value(&mut self, new_value: impl Into<String>) -> bool {
        let new_value = new_value.into();
        if self.value.as_deref() == Some(new_value.as_str()) {
            tracing::debug!("Property {} unchanged", self.name);
            return false;
        }

        self.value = Some(new_value);
        let notified = self.changed.publish(&PropertyChanged {
            name: self.name.clone(),
        });
        tracing::debug!("Property {} changed, notified {} observer(s)", self.name, notified);
        true
    }

    pub fn on_change<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + Send + Sync + 'static,
    {
        self.changed.subscribe(handler)
    }
}

impl PropertyNotifier for NamedProperty {
    fn property_changed(&self) -> &Event<PropertyChanged> {
        &self.changed
    }
}

/// 範例物件：只有一個 `Name` 屬性
#[derive(Debug)]
pub struct Profile {
    name: NamedProperty,
}

impl Profile {
    pub fn new() -> Self {
        Self {
            name: NamedProperty::new("Name"),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.value()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        self.name.set_value(name)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyNotifier for Profile {
    fn property_changed(&self) -> &Event<PropertyChanged> {
        self.name.property_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn track(property: &NamedProperty, tag: &'static str, log: &Arc<Mutex<Vec<String>>>) {
        let log = Arc::clone(log);
        property.on_change(move |args| log.lock().unwrap().push(format!("{}:{}", tag, args.name)));
    }

    #[test]
    fn test_starts_unset() {
        let property = NamedProperty::new("Name");
        assert_eq!(property.name(), "Name");
        assert_eq!(property.value(), None);
    }

    #[test]
    fn test_same_value_notifies_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut property = NamedProperty::new("Name");
        track(&property, "a", &log);

        assert!(property.set_value("Alice"));
        assert!(!property.set_value("Alice"));

        assert_eq!(*log.lock().unwrap(), vec!["a:Name"]);
        assert_eq!(property.value(), Some("Alice"));
    }

    #[test]
    fn test_observers_called_in_order_with_name() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut property = NamedProperty::new("Title");
        track(&property, "first", &log);
        track(&property, "second", &log);

        property.set_value("one");
        property.set_value("two");

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:Title", "second:Title", "first:Title", "second:Title"]
        );
    }

    #[test]
    fn test_empty_string_differs_from_unset() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut property = NamedProperty::new("Name");
        track(&property, "a", &log);

        assert!(property.set_value(""));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_profile_notifies_through_trait() {
        let count = Arc::new(Mutex::new(0));
        let mut profile = Profile::new();
        {
            let count = Arc::clone(&count);
            profile
                .property_changed()
                .subscribe(move |args| {
                    assert_eq!(args.name, "Name");
                    *count.lock().unwrap() += 1;
                });
        }

        profile.set_name("New name");
        profile.set_name("New name");
        profile.set_name("Other");

        assert_eq!(*count.lock().unwrap(), 2);
        assert_eq!(profile.name(), Some("Other"));
    }
}
