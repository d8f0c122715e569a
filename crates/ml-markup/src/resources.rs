//! Named value slots that deferred commands operate on.

use std::collections::HashMap;

use crate::coerce::CoerceError;
use crate::value::Value;

/// Error raised when a [`Command`](crate::Command) is invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("resource '{key}' is not a boolean; '!' requires a boolean (current value: {current})")]
    NotBoolean { key: String, current: String },

    #[error("resource '{key}' holds a value that cannot be assigned from text")]
    NotAssignable { key: String },

    #[error("resource '{key}': {source}")]
    Convert {
        key: String,
        #[source]
        source: CoerceError,
    },
}

/// Mutable resource slots owned by the rendering layer.
///
/// A missing key reads as [`Value::Null`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceDictionary {
    slots: HashMap<String, Value>,
}

impl ResourceDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, or `Null` when unset.
    #[must_use]
    pub fn get(&self, key: &str) -> &Value {
        self.slots.get(key).unwrap_or(&Value::Null)
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.slots.insert(key.into(), value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ResourceDictionary {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_null() {
        let resources = ResourceDictionary::new();
        assert_eq!(resources.get("IsOpen"), &Value::Null);
        assert!(!resources.contains_key("IsOpen"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut resources: ResourceDictionary = [("IsOpen", Value::Bool(false))].into_iter().collect();
        assert_eq!(
            resources.insert("IsOpen", Value::Bool(true)),
            Some(Value::Bool(false))
        );
        assert_eq!(resources.get("IsOpen"), &Value::Bool(true));
        assert_eq!(resources.len(), 1);
    }
}
