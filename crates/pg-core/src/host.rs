//! Host environment
//!
//! A snapshot of the environment variables the playthings care about, taken
//! once so that the rest of the crate never reads process state directly.

use crate::error::ActivityError;
use std::collections::HashMap;
use std::path::PathBuf;

/// Presence marks a managed function-app host
pub const MANAGED_HOSTING_MARKER: &str = "WEBSITE_CONTENTSHARE";
/// Document store endpoint
pub const COSMOS_URI_VAR: &str = "PLAYGROUND_COSMOSDB_URI";
/// Document store master key
pub const COSMOS_KEY_VAR: &str = "PLAYGROUND_COSMOSDB_KEY";
/// Base URL for keep-warm pings
pub const PING_URL_BASE_VAR: &str = "PLAYGROUND_PING_URL_BASE";
/// Session cookie signing key
pub const COOKIE_KEY_VAR: &str = "FLASK_COOKIE_KEY";

const KNOWN_VARS: [&str; 5] = [
    MANAGED_HOSTING_MARKER,
    COSMOS_URI_VAR,
    COSMOS_KEY_VAR,
    PING_URL_BASE_VAR,
    COOKIE_KEY_VAR,
];

const DEFAULT_COOKIE_KEY: &str = "WGFEhV5j3muB5A";

/// Environment variables relevant to a plaything process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    vars: HashMap<String, String>,
}

impl HostEnvironment {
    /// Capture the known variables from the current process
    #[must_use]
    pub fn from_process() -> Self {
        let vars = KNOWN_VARS
            .iter()
            .filter_map(|k| std::env::var(k).ok().map(|v| ((*k).to_string(), v)))
            .collect();
        Self { vars }
    }

    /// Build from explicit pairs
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Variable value, if set
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Variable value, or [`ActivityError::MissingEnv`]
    ///
    /// # Errors
    /// Returns error if the variable is not set.
    pub fn require(&self, key: &str) -> Result<&str, ActivityError> {
        self.get(key).ok_or_else(|| ActivityError::MissingEnv(key.to_string()))
    }

    /// Running as a managed function app
    #[inline]
    #[must_use]
    pub fn is_managed_hosting(&self) -> bool {
        self.vars.contains_key(MANAGED_HOSTING_MARKER)
    }

    /// `/Config` under managed hosting, `../Config` otherwise
    #[must_use]
    pub fn default_config_base(&self) -> PathBuf {
        if self.is_managed_hosting() {
            PathBuf::from("/Config")
        } else {
            PathBuf::from("../Config")
        }
    }

    /// Directory for rotating log files outside managed hosting
    #[must_use]
    pub fn default_log_dir(&self) -> PathBuf {
        PathBuf::from("../Logs")
    }

    /// Keep-warm ping base URL
    #[inline]
    #[must_use]
    pub fn ping_url_base(&self) -> Option<&str> {
        self.get(PING_URL_BASE_VAR)
    }

    /// Session cookie signing key, falling back (with a warning) to a default
    #[must_use]
    pub fn cookie_signing_key(&self) -> String {
        match self.get(COOKIE_KEY_VAR) {
            Some(key) => key.to_string(),
            None => {
                tracing::warn!("Using default cookie signing key for sessions.");
                DEFAULT_COOKIE_KEY.to_string()
            }
        }
    }
}
