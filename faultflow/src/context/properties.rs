//! Thread-safe property bags for contexts and builders.

use parking_lot::RwLock;
use std::collections::HashMap;

/// A thread-safe, string-keyed bag of arbitrary JSON values.
///
/// Builder-level properties are frozen once strategies are materialized;
/// context-level properties stay mutable for the duration of one call.
#[derive(Debug, Default)]
pub struct ResilienceProperties {
    data: RwLock<HashMap<String, serde_json::Value>>,
}

impl ResilienceProperties {
    /// Creates a new empty property bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a property bag from existing data.
    #[must_use]
    pub fn from_data(data: HashMap<String, serde_json::Value>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Gets a value from the bag.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.data.read().get(key).cloned()
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Sets a value in the bag, overwriting any existing entry.
    pub fn set(&self, key: impl Into<String>, value: serde_json::Value) {
        self.data.write().insert(key.into(), value);
    }

    /// Returns a copy of all data.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, serde_json::Value> {
        self.data.read().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Returns all keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }
}

impl Clone for ResilienceProperties {
    fn clone(&self) -> Self {
        Self {
            data: RwLock::new(self.data.read().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let props = ResilienceProperties::new();
        props.set("key", serde_json::json!("value"));

        assert_eq!(props.get("key"), Some(serde_json::json!("value")));
        assert!(props.contains_key("key"));
        assert!(!props.contains_key("other"));
    }

    #[test]
    fn test_overwrite() {
        let props = ResilienceProperties::new();
        props.set("key", serde_json::json!(1));
        props.set("key", serde_json::json!(2));

        assert_eq!(props.get("key"), Some(serde_json::json!(2)));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let props = ResilienceProperties::new();
        props.set("a", serde_json::json!(1));

        let snap = props.snapshot();
        props.set("b", serde_json::json!(2));

        assert_eq!(snap.len(), 1);
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_clone_is_deep() {
        let props = ResilienceProperties::new();
        props.set("a", serde_json::json!(1));

        let copy = props.clone();
        copy.set("b", serde_json::json!(2));

        assert!(!props.contains_key("b"));
    }
}
