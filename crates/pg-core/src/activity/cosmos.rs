//! Document-store client for activity records
//!
//! Talks to the store's REST interface directly over blocking HTTP. Requests
//! are authorised with the account master key: an HMAC-SHA256 over the verb,
//! resource type, resource link and date, base64-encoded and URL-encoded into
//! the `authorization` header.

use super::store::ActivityStore;
use crate::config::ActivityConfig;
use crate::error::ActivityError;
use crate::host::{HostEnvironment, COSMOS_KEY_VAR, COSMOS_URI_VAR};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::blocking::{Client, Response};
use serde_json::{Map, Value};
use sha2::Sha256;
use std::time::Duration;

const API_VERSION: &str = "2018-12-31";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current time in the store's RFC 1123 header format
#[must_use]
pub fn request_date() -> String {
    chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Authorisation token for one request
///
/// # Errors
/// [`ActivityError::InvalidKey`] if the key cannot seed the MAC.
pub fn sign_request(
    key: &[u8],
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> Result<String, ActivityError> {
    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(|e| ActivityError::InvalidKey(e.to_string()))?;
    mac.update(payload.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());
    Ok(urlencoding::encode(&format!("type=master&ver=1.0&sig={signature}")).into_owned())
}

/// A container in the document store, partitioned by plaything name
pub struct CosmosContainer {
    client: Client,
    endpoint: String,
    key: Vec<u8>,
    collection_link: String,
    partition_key: String,
}

impl std::fmt::Debug for CosmosContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmosContainer")
            .field("endpoint", &self.endpoint)
            .field("collection_link", &self.collection_link)
            .field("partition_key", &self.partition_key)
            .finish_non_exhaustive()
    }
}

impl CosmosContainer {
    /// Build a client without contacting the store
    ///
    /// # Errors
    /// Returns error if the key is not base64 or the HTTP client cannot be
    /// built.
    pub fn new(
        endpoint: &str,
        master_key: &str,
        database: &str,
        container: &str,
        partition_key: impl Into<String>,
    ) -> Result<Self, ActivityError> {
        let key = STANDARD
            .decode(master_key.trim())
            .map_err(|e| ActivityError::InvalidKey(e.to_string()))?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key,
            collection_link: format!("dbs/{database}/colls/{container}"),
            partition_key: partition_key.into(),
        })
    }

    /// Build from the environment and `core_config.json` settings, then
    /// probe the container
    ///
    /// # Errors
    /// Returns error for a missing variable or setting, or if the probe
    /// fails.
    pub fn connect(env: &HostEnvironment, config: &ActivityConfig, plaything_name: &str) -> Result<Self, ActivityError> {
        let endpoint = env.require(COSMOS_URI_VAR)?;
        let master_key = env.require(COSMOS_KEY_VAR)?;
        let database = config
            .database
            .as_deref()
            .ok_or_else(|| ActivityError::MissingConfig("database".into()))?;
        let container = config
            .container
            .as_deref()
            .ok_or_else(|| ActivityError::MissingConfig("container".into()))?;

        let store = Self::new(endpoint, master_key, database, container, plaything_name)?;
        store.probe()?;
        tracing::info!("Connected activity store container {}", store.collection_link);
        Ok(store)
    }

    /// Resource link of the container (`dbs/{db}/colls/{coll}`)
    #[inline]
    #[must_use]
    pub fn collection_link(&self) -> &str {
        &self.collection_link
    }

    /// Read the container metadata to confirm it is reachable
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success status.
    pub fn probe(&self) -> Result<(), ActivityError> {
        let date = request_date();
        let auth = sign_request(&self.key, "GET", "colls", &self.collection_link, &date)?;
        let response = self
            .client
            .get(format!("{}/{}", self.endpoint, self.collection_link))
            .header("authorization", auth)
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION)
            .send()?;
        check_status(response)
    }
}

fn check_status(response: Response) -> Result<(), ActivityError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().unwrap_or_default();
    Err(ActivityError::Status {
        status: status.as_u16(),
        body,
    })
}

impl ActivityStore for CosmosContainer {
    fn create_item(&self, item: &Map<String, Value>) -> Result<(), ActivityError> {
        let mut item = item.clone();
        if !item.contains_key("id") {
            item.insert("id".into(), Value::from(uuid::Uuid::new_v4().to_string()));
        }

        let date = request_date();
        let auth = sign_request(&self.key, "POST", "docs", &self.collection_link, &date)?;
        let partition = Value::Array(vec![Value::from(self.partition_key.as_str())]).to_string();

        let response = self
            .client
            .post(format!("{}/{}/docs", self.endpoint, self.collection_link))
            .header("authorization", auth)
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION)
            .header("x-ms-documentdb-partitionkey", partition)
            .json(&item)
            .send()?;
        check_status(response)
    }
}
