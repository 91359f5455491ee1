//! JSON document loader
//!
//! Reads JSON with logging of file-not-found and parse problems, which makes
//! for far more intelligible logs than a bare `serde_json` error. Missing and
//! broken documents degrade to an empty object; with `soft_error` a parse
//! failure is handed back as text so the caller can display it.

use crate::error::{AssetError, AssetResult};
use serde_json::{Map, Value};
use std::path::Path;

/// Outcome of [`read_json_file`]
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRead {
    /// Parsed document, or an empty object if the file was missing/broken
    Value(Value),
    /// Parser message (only produced when `soft_error` was requested)
    ParseError(String),
}

impl JsonRead {
    /// Take the parsed value, treating a soft parse error as an empty object
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::ParseError(_) => empty_object(),
        }
    }

    /// Whether the read produced an empty object (missing file or `{}`)
    #[inline]
    #[must_use]
    pub fn is_empty_object(&self) -> bool {
        matches!(self, Self::Value(Value::Object(map)) if map.is_empty())
    }
}

/// A fresh empty JSON object
#[inline]
#[must_use]
pub fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Read and parse a JSON file, reporting the failure class
///
/// # Errors
/// [`AssetError::NotFound`] when the file is absent, [`AssetError::Syntax`]
/// when it cannot be parsed, [`AssetError::Io`] for any other read failure.
pub fn try_read_json(path: &Path) -> AssetResult<Value> {
    let content = std::fs::read(path).map_err(|e| AssetError::io_error(path, e))?;
    serde_json::from_slice(&content).map_err(|e| AssetError::syntax_error(path, e.to_string()))
}

/// Read JSON into a value, logging problems
///
/// File not found always yields an empty object and an error log, whatever
/// `soft_error` says. A parse failure yields an empty object and an error log,
/// unless `soft_error` is set, in which case nothing is logged and the parser
/// message is returned as [`JsonRead::ParseError`].
pub fn read_json_file(path: impl AsRef<Path>, soft_error: bool) -> JsonRead {
    let path = path.as_ref();
    match try_read_json(path) {
        Ok(value) => JsonRead::Value(value),
        Err(AssetError::NotFound { .. }) => {
            tracing::error!("Failed to find JSON file at: {}.", path.display());
            JsonRead::Value(empty_object())
        }
        Err(AssetError::Syntax { message, .. }) if soft_error => {
            JsonRead::ParseError(format!("{message}."))
        }
        Err(err) => {
            tracing::error!("Loading {} could not be parsed: {}", path.display(), err);
            JsonRead::Value(empty_object())
        }
    }
}

/// Shorthand for `read_json_file(path, false).into_value()`
#[inline]
#[must_use]
pub fn read_json_value(path: impl AsRef<Path>) -> Value {
    read_json_file(path, false).into_value()
}

/// Deep-merge `overlay` onto `base`
///
/// Objects are merged key by key; any other overlay value replaces the base.
#[must_use]
pub fn merge_json(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_val) in overlay_map {
                let merged = match result.get(key) {
                    Some(base_val) => merge_json(base_val, overlay_val),
                    None => overlay_val.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        (_, overlay_val) => overlay_val.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        write_temp_bytes(content.as_bytes())
    }

    fn write_temp_bytes(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` and return what it logged
    fn logged<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
        (out, text)
    }

    #[test]
    fn reads_valid_document() {
        let file = write_temp(r#"{"title": "T", "n": 2}"#);
        let read = read_json_file(file.path(), false);
        assert_eq!(read, JsonRead::Value(json!({"title": "T", "n": 2})));
    }

    #[test]
    fn missing_file_is_empty_object_either_way() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let (hard, log) = logged(|| read_json_file(&path, false));
        assert!(hard.is_empty_object());
        assert!(log.contains("ERROR"));
        assert!(log.contains("Failed to find JSON file at:"));
        assert!(log.contains("absent.json"));

        let (soft, log) = logged(|| read_json_file(&path, true));
        assert!(soft.is_empty_object());
        assert!(log.contains("ERROR"));
    }

    #[test]
    fn parse_error_hard_is_empty_object() {
        let file = write_temp("{bad");
        let (read, log) = logged(|| read_json_file(file.path(), false));
        assert!(read.is_empty_object());
        assert!(log.contains("ERROR"));
        assert!(log.contains("could not be parsed"));
    }

    #[test]
    fn parse_error_soft_is_not_logged() {
        let file = write_temp("{bad");
        let (read, log) = logged(|| read_json_file(file.path(), true));
        assert!(matches!(read, JsonRead::ParseError(_)));
        assert!(!log.contains("ERROR"));
    }

    #[test]
    fn parse_error_soft_returns_message() {
        let file = write_temp("{bad");
        match read_json_file(file.path(), true) {
            JsonRead::ParseError(msg) => {
                assert!(msg.contains("line 1"));
                assert!(msg.ends_with('.'));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let file = write_temp_bytes(b"{\"title\": \"caf\xe9\"}");
        match read_json_file(file.path(), true) {
            JsonRead::ParseError(msg) => assert!(msg.ends_with('.')),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(matches!(try_read_json(file.path()), Err(AssetError::Syntax { .. })));
    }

    #[test]
    fn try_read_distinguishes_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = try_read_json(&dir.path().join("x.json")).unwrap_err();
        assert!(missing.is_not_found());

        let file = write_temp("[1,");
        let broken = try_read_json(file.path()).unwrap_err();
        assert!(matches!(broken, AssetError::Syntax { .. }));
    }

    #[test]
    fn soft_error_into_value_is_empty() {
        let read = JsonRead::ParseError("oops.".to_string());
        assert_eq!(read.into_value(), json!({}));
    }

    #[test]
    fn merge_objects_deeply() {
        let base = json!({"activity": {"enabled": false, "database": "db"}, "keep_warm": true});
        let overlay = json!({"activity": {"enabled": true}, "plaything_name_in_path": true});

        let merged = merge_json(&base, &overlay);
        assert_eq!(
            merged,
            json!({
                "activity": {"enabled": true, "database": "db"},
                "keep_warm": true,
                "plaything_name_in_path": true
            })
        );
    }

    #[test]
    fn merge_replaces_non_objects() {
        let merged = merge_json(&json!({"menu": [1, 2]}), &json!({"menu": [3]}));
        assert_eq!(merged, json!({"menu": [3]}));
    }

    proptest! {
        #[test]
        fn soft_error_never_panics_on_malformed(body in "[a-z{}\\[\\]:,\" ]{1,40}") {
            prop_assume!(serde_json::from_str::<Value>(&body).is_err());
            let file = write_temp(&body);
            match read_json_file(file.path(), true) {
                JsonRead::ParseError(msg) => prop_assert!(!msg.is_empty()),
                JsonRead::Value(v) => prop_assert!(false, "unexpected value {v}"),
            }
        }
    }
}
