//! Ad hoc record store
//!
//! An in-memory accumulator for user-driven records pushed during event
//! callbacks. Entirely independent of the page and link ledgers: clearing
//! one never touches the other.

use parking_lot::RwLock;
use serde_json::Value;

/// Append-only store of user records
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: RwLock<Vec<Value>>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record
    pub fn push(&self, record: Value) {
        self.inner.write().push(record);
    }

    /// All records as a JSON array, in insertion order
    #[must_use]
    pub fn read(&self) -> Value {
        Value::Array(self.inner.read().clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_returns_insertion_order() {
        let store = RecordStore::new();
        store.push(json!({"n": 1}));
        store.push(json!({"n": 2}));
        assert_eq!(store.read(), json!([{"n": 1}, {"n": 2}]));
    }

    #[test]
    fn clear_only_touches_records() {
        let store = RecordStore::new();
        store.push(json!("x"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.read(), json!([]));
    }
}
