//! Activity records and the session slot they depend on

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Session key holding the generated session identifier
pub const SESSION_ID_KEY: &str = "session_id";

/// Per-user session storage owned by the request layer
///
/// Only string slots are needed; the session cookie itself is the caller's
/// concern.
pub trait SessionStore {
    /// Value stored under `key`
    fn get_value(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`
    fn set_value(&mut self, key: &str, value: String);
}

impl SessionStore for HashMap<String, String> {
    fn get_value(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

/// One user-interaction event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    /// Plaything that served the request
    pub plaything_name: String,
    /// Page or endpoint within the plaything
    pub plaything_part: String,
    /// Specification in use
    pub specification_id: String,
    /// Browser session identifier
    pub session_id: String,
    /// Request referrer
    pub referrer: Option<String>,
    /// Free-form marker, such as an experiment arm
    pub tag: Option<String>,
    /// Plaything-specific fields
    #[serde(skip)]
    pub activity: Map<String, Value>,
}

impl ActivityRecord {
    /// Flat JSON document as stored; plaything fields overwrite generic ones
    #[must_use]
    pub fn to_document(&self) -> Map<String, Value> {
        let mut doc = Map::new();
        doc.insert("plaything_name".into(), Value::from(self.plaything_name.as_str()));
        doc.insert("plaything_part".into(), Value::from(self.plaything_part.as_str()));
        doc.insert("specification_id".into(), Value::from(self.specification_id.as_str()));
        doc.insert("session_id".into(), Value::from(self.session_id.as_str()));
        doc.insert("referrer".into(), self.referrer.clone().map_or(Value::Null, Value::from));
        doc.insert("tag".into(), self.tag.clone().map_or(Value::Null, Value::from));
        for (k, v) in &self.activity {
            doc.insert(k.clone(), v.clone());
        }
        doc
    }
}
