//! Testing utilities for the playground workspace
//!
//! Temporary configuration trees, sessions, stores and log capture shared by
//! the integration tests.

#![allow(missing_docs)]

use parking_lot::Mutex;
use pg_core::{ActivityError, ActivityStore, Core, CoreOptions, HostEnvironment, CORE_CONFIG_FILE};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing_subscriber::fmt::writer::MakeWriter;

/// A configuration base in a temporary directory, removed on drop
#[derive(Debug)]
pub struct ConfigTree {
    dir: TempDir,
    plaything: String,
}

impl ConfigTree {
    /// Empty base with a directory for `plaything`
    pub fn new(plaything: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(plaything).join("assets")).unwrap();
        Self {
            dir,
            plaything: plaything.to_string(),
        }
    }

    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    pub fn plaything_dir(&self) -> PathBuf {
        self.dir.path().join(&self.plaything)
    }

    pub fn asset_path(&self, file: &str) -> PathBuf {
        self.plaything_dir().join("assets").join(file)
    }

    /// Global `core_config.json`
    pub fn with_core_config(self, config: &Value) -> Self {
        fs::write(self.base().join(CORE_CONFIG_FILE), config.to_string()).unwrap();
        self
    }

    /// Per-plaything `core_config.json`
    pub fn with_plaything_config(self, config: &Value) -> Self {
        fs::write(self.plaything_dir().join(CORE_CONFIG_FILE), config.to_string()).unwrap();
        self
    }

    /// Specification document from a JSON value
    pub fn with_spec(self, id: &str, doc: &Value) -> Self {
        self.with_raw_spec(id, &doc.to_string())
    }

    /// Specification document from raw text (which need not be valid JSON)
    pub fn with_raw_spec(self, id: &str, text: &str) -> Self {
        fs::write(self.plaything_dir().join(format!("{id}.json")), text).unwrap();
        self
    }

    /// File under `assets/`
    pub fn with_asset(self, file: &str, contents: impl AsRef<[u8]>) -> Self {
        fs::write(self.asset_path(file), contents).unwrap();
        self
    }

    /// Options pointing at this tree with an empty environment
    pub fn options(&self) -> CoreOptions {
        CoreOptions::new()
            .with_config_base(self.base())
            .with_environment(HostEnvironment::default())
    }

    pub fn core(&self) -> Core {
        Core::with_options(&self.plaything, self.options()).unwrap()
    }

    pub fn core_with_store(&self, store: Arc<dyn ActivityStore>) -> Core {
        Core::with_options(&self.plaything, self.options().with_activity_store(store)).unwrap()
    }
}

/// A session slot as the request layer would hold it
pub fn session() -> HashMap<String, String> {
    HashMap::new()
}

/// Store that rejects every write
#[derive(Debug, Default)]
pub struct FailingActivityStore;

impl ActivityStore for FailingActivityStore {
    fn create_item(&self, _item: &Map<String, Value>) -> Result<(), ActivityError> {
        Err(ActivityError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

/// Collects formatted log lines emitted while a closure runs
///
/// The subscriber is scoped to the calling thread, so parallel tests do not
/// see each other's output.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with every event down to `TRACE` written into this capture
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Captured lines logged at `level` (`"ERROR"`, `"WARN"`, ...)
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .map(str::to_string)
            .collect()
    }
}

/// Writer handed out by [`LogCapture`]
#[derive(Debug)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}
