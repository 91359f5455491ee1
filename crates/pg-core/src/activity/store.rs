//! Activity store abstraction

use crate::error::ActivityError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Destination for activity documents
pub trait ActivityStore: Debug + Send + Sync {
    /// Persist one document; the store assigns an `id` if none is present
    ///
    /// # Errors
    /// Returns error if the store rejects the write or cannot be reached.
    fn create_item(&self, item: &Map<String, Value>) -> Result<(), ActivityError>;
}

/// In-process store that keeps every document it is given
#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    items: Mutex<Vec<Map<String, Value>>>,
}

impl MemoryActivityStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored documents, oldest first
    #[must_use]
    pub fn items(&self) -> Vec<Map<String, Value>> {
        self.items.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl ActivityStore for MemoryActivityStore {
    fn create_item(&self, item: &Map<String, Value>) -> Result<(), ActivityError> {
        let mut item = item.clone();
        if !item.contains_key("id") {
            item.insert("id".into(), Value::from(uuid::Uuid::new_v4().to_string()));
        }
        self.items.lock().push(item);
        Ok(())
    }
}
