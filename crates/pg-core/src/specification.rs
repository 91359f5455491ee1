//! Specifications
//!
//! A specification is one configured instance of a plaything: a JSON document
//! at `{dir}/{id}.json` carrying title, summary, a domain-specific `detail`
//! payload and an asset map pointing at files under `{dir}/assets/`.
//!
//! Loading never fails. A missing, empty or broken document degrades to a
//! placeholder whose title and summary describe the problem, so that a broken
//! specification renders as an informative page rather than an error.

use crate::menu::{render_menu_html, render_menu_tree, resolve_menu, MenuEntry, MenuRequest};
use indexmap::IndexMap;
use pg_assets::{
    read_frame, read_json_file, read_markdown, read_object, read_records, render_html, substitute_placeholders,
    AssetKind, AssetResult, ColumnType, DataFrame, JsonRead, Record,
};
use pg_ui::Component;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Wildcard accepted in `menu_items`
pub const MENU_WILDCARD: &str = "*";

/// Which menu views a specification shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMenuItems", into = "RawMenuItems")]
pub enum MenuItems {
    /// Every view in the plaything menu (`"*"`)
    #[default]
    All,
    /// Only these views, in this order
    Views(Vec<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMenuItems {
    Wildcard(String),
    List(Vec<String>),
}

impl TryFrom<RawMenuItems> for MenuItems {
    type Error = String;

    fn try_from(raw: RawMenuItems) -> Result<Self, Self::Error> {
        match raw {
            RawMenuItems::Wildcard(s) if s == MENU_WILDCARD => Ok(Self::All),
            RawMenuItems::Wildcard(s) => Err(format!("menu_items must be \"*\" or a list of views, got \"{s}\"")),
            RawMenuItems::List(views) => Ok(Self::Views(views)),
        }
    }
}

impl From<MenuItems> for RawMenuItems {
    fn from(items: MenuItems) -> Self {
        match items {
            MenuItems::All => Self::Wildcard(MENU_WILDCARD.to_string()),
            MenuItems::Views(views) => Self::List(views),
        }
    }
}

/// On-disk layout of a specification document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationDocument {
    /// Listed in indexes
    pub enabled: bool,
    /// Display title; a placeholder is substituted when absent
    pub title: Option<String>,
    /// Display summary
    pub summary: String,
    /// Language code for specification-declared text
    pub lang: String,
    /// View to open first
    pub initial_view: Option<String>,
    /// Plaything-specific payload
    pub detail: Value,
    /// Menu filter
    pub menu_items: MenuItems,
    /// Asset key to file name under `assets/`
    pub asset_map: IndexMap<String, String>,
}

impl Default for SpecificationDocument {
    fn default() -> Self {
        Self {
            enabled: false,
            title: None,
            summary: String::new(),
            lang: "en".to_string(),
            initial_view: None,
            detail: Value::Object(Map::new()),
            menu_items: MenuItems::All,
            asset_map: IndexMap::new(),
        }
    }
}

impl SpecificationDocument {
    /// Read a document field by field
    ///
    /// Absent and `null` fields take their default. A field of the wrong type
    /// is logged and defaulted on its own, keeping the rest of the document.
    #[must_use]
    pub fn from_map(mut map: Map<String, Value>, source: &str) -> Self {
        let defaults = Self::default();
        Self {
            enabled: field(&mut map, "enabled", source).unwrap_or(defaults.enabled),
            title: field(&mut map, "title", source),
            summary: field(&mut map, "summary", source).unwrap_or(defaults.summary),
            lang: field(&mut map, "lang", source).unwrap_or(defaults.lang),
            initial_view: field(&mut map, "initial_view", source),
            detail: field(&mut map, "detail", source).unwrap_or(defaults.detail),
            menu_items: field(&mut map, "menu_items", source).unwrap_or(defaults.menu_items),
            asset_map: field(&mut map, "asset_map", source).unwrap_or(defaults.asset_map),
        }
    }
}

fn field<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str, source: &str) -> Option<T> {
    let value = map.remove(key).filter(|v| !v.is_null())?;
    serde_json::from_value(value)
        .map_err(|e| tracing::warn!("Ignoring field {} of specification {}: {}", key, source, e))
        .ok()
}

fn placeholder(title: String, summary: Option<String>) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("title".to_string(), Value::String(title));
    if let Some(summary) = summary {
        map.insert("summary".to_string(), Value::String(summary));
    }
    map
}

fn broken_document(specification_id: &str, message: &str) -> Map<String, Value> {
    placeholder(
        format!("Broken JSON file for specification id = {specification_id}."),
        Some(format!("Error is: {message}")),
    )
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        _ => false,
    }
}

/// One loaded specification
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    dir_path: PathBuf,
    specification_id: String,
    enabled: bool,
    title: String,
    summary: String,
    lang: String,
    initial_view: Option<String>,
    detail: Value,
    menu_items: MenuItems,
    asset_map: IndexMap<String, String>,
}

impl Specification {
    /// Load `{dir_path}/{specification_id}.json`, degrading to a placeholder
    pub fn load(dir_path: impl Into<PathBuf>, specification_id: impl Into<String>) -> Self {
        let dir_path = dir_path.into();
        let specification_id = specification_id.into();
        let path = dir_path.join(format!("{specification_id}.json"));

        let map = match read_json_file(&path, true) {
            JsonRead::ParseError(message) => broken_document(&specification_id, &message),
            JsonRead::Value(value) if is_empty_document(&value) => {
                placeholder(format!("Nothing found for specification id = {specification_id}."), None)
            }
            JsonRead::Value(Value::Object(map)) => map,
            JsonRead::Value(_) => {
                tracing::error!("Specification {} is not a JSON object.", path.display());
                broken_document(&specification_id, "expected a JSON object.")
            }
        };

        let document = SpecificationDocument::from_map(map, &specification_id);
        Self::from_document(dir_path, specification_id, document)
    }

    /// Build from an already parsed document
    pub fn from_document(
        dir_path: impl Into<PathBuf>,
        specification_id: impl Into<String>,
        document: SpecificationDocument,
    ) -> Self {
        let specification_id = specification_id.into();
        let title = document
            .title
            .unwrap_or_else(|| format!("<missing title for {specification_id}>"));
        Self {
            dir_path: dir_path.into(),
            specification_id,
            enabled: document.enabled,
            title,
            summary: document.summary,
            lang: document.lang,
            initial_view: document.initial_view,
            detail: document.detail,
            menu_items: document.menu_items,
            asset_map: document.asset_map,
        }
    }

    /// Identifier (file stem)
    #[inline]
    #[must_use]
    pub fn specification_id(&self) -> &str {
        &self.specification_id
    }

    /// Directory holding the document
    #[inline]
    #[must_use]
    pub fn dir_path(&self) -> &Path {
        &self.dir_path
    }

    /// Listed in indexes
    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Display title, or a placeholder
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display summary, including any asset map issues appended by a check
    #[inline]
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Language code
    #[inline]
    #[must_use]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// View to open first
    #[inline]
    #[must_use]
    pub fn initial_view(&self) -> Option<&str> {
        self.initial_view.as_deref()
    }

    /// Plaything-specific payload
    #[inline]
    #[must_use]
    pub fn detail(&self) -> &Value {
        &self.detail
    }

    /// Menu filter
    #[inline]
    #[must_use]
    pub fn menu_items(&self) -> &MenuItems {
        &self.menu_items
    }

    /// Asset key to file name
    #[inline]
    #[must_use]
    pub fn asset_map(&self) -> &IndexMap<String, String> {
        &self.asset_map
    }

    /// Path of the file mapped to `asset_key`
    #[must_use]
    pub fn asset_path(&self, asset_key: &str) -> Option<PathBuf> {
        self.asset_map
            .get(asset_key)
            .map(|file| self.dir_path.join("assets").join(file))
    }

    /// Check required keys are mapped and that mapped files exist
    ///
    /// Returns problem messages by asset key; keys without problems are
    /// absent. With `update_spec`, any problems are appended to the summary.
    pub fn check_assets(
        &mut self,
        required_keys: &[&str],
        optional_keys: &[&str],
        update_spec: bool,
    ) -> IndexMap<String, String> {
        let mut problems: IndexMap<String, String> = required_keys
            .iter()
            .filter(|k| !self.asset_map.contains_key(**k))
            .map(|k| ((*k).to_string(), "missing from specification".to_string()))
            .collect();

        for key in required_keys.iter().chain(optional_keys) {
            if let Some(asset_file) = self.asset_path(key) {
                if !asset_file.exists() {
                    problems.insert(
                        (*key).to_string(),
                        format!("failed to find mapped file {}", asset_file.display()),
                    );
                }
            }
        }

        if update_spec && !problems.is_empty() {
            let listing: Vec<String> = problems.iter().map(|(k, v)| format!("{k} - {v}")).collect();
            self.summary = format!("{} *** Asset map issues: {}.", self.summary, listing.join("; "));
        }

        problems
    }

    /// Key mapped, file present, extension right; otherwise log and `None`
    fn preload(&self, asset_key: &str, kind: AssetKind) -> Option<PathBuf> {
        let Some(asset_file) = self.asset_path(asset_key) else {
            tracing::error!(
                "Failed to find asset key {} for specification {}.",
                asset_key,
                self.specification_id
            );
            return None;
        };

        if !asset_file.exists() {
            tracing::error!(
                "Failed to find file {} for asset key {} for specification {}.",
                asset_file.display(),
                asset_key,
                self.specification_id
            );
            return None;
        }

        if !kind.matches(&asset_file) {
            tracing::error!(
                "Asset file {} for asset key {} for specification {} was of the wrong type; expected {}.",
                asset_file.display(),
                asset_key,
                self.specification_id,
                kind
            );
            return None;
        }

        Some(asset_file)
    }

    /// CSV asset as typed columns, optionally coercing named columns
    ///
    /// # Errors
    /// Returns error if the file cannot be read or a coercion fails.
    pub fn load_asset_frame(
        &self,
        asset_key: &str,
        dtypes: Option<&HashMap<String, ColumnType>>,
    ) -> AssetResult<Option<DataFrame>> {
        self.preload(asset_key, AssetKind::Csv)
            .map(|file| read_frame(&file, dtypes))
            .transpose()
    }

    /// CSV asset as one string map per row, keyed by the header
    ///
    /// # Errors
    /// Returns error if the file cannot be read as CSV.
    pub fn load_asset_records(&self, asset_key: &str) -> AssetResult<Option<Vec<Record>>> {
        self.preload(asset_key, AssetKind::Csv)
            .map(|file| read_records(&file))
            .transpose()
    }

    /// Markdown asset as text, or rendered to HTML
    ///
    /// `replacements` fill `{name}` placeholders and apply only when rendering.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or a placeholder has no
    /// replacement.
    pub fn load_asset_markdown(
        &self,
        asset_key: &str,
        render: bool,
        replacements: Option<&HashMap<String, String>>,
    ) -> AssetResult<Option<String>> {
        let Some(file) = self.preload(asset_key, AssetKind::Markdown) else {
            return Ok(None);
        };
        let markdown = read_markdown(&file)?;
        if !render {
            return Ok(Some(markdown));
        }
        let html = match replacements {
            Some(r) => render_html(&substitute_placeholders(&markdown, r)?),
            None => render_html(&markdown),
        };
        Ok(Some(html))
    }

    /// Bincode-encoded application object
    ///
    /// # Errors
    /// Returns error if the file cannot be decoded as `T`.
    pub fn load_asset_object<T: DeserializeOwned>(&self, asset_key: &str) -> AssetResult<Option<T>> {
        self.preload(asset_key, AssetKind::Object)
            .map(|file| read_object(&file))
            .transpose()
    }

    /// Arbitrary JSON asset
    ///
    /// Parse failures are logged and give an empty object.
    #[must_use]
    pub fn load_asset_json(&self, asset_key: &str) -> Option<Value> {
        self.preload(asset_key, AssetKind::Json)
            .map(|file| read_json_file(&file, false).into_value())
    }

    /// Menu entries for this specification
    #[must_use]
    pub fn menu_entries(&self, request: &MenuRequest<'_>) -> Vec<MenuEntry> {
        resolve_menu(request, &self.specification_id, &self.menu_items)
    }

    /// Menu as HTML markup; empty unless `menu=1` is requested
    #[must_use]
    pub fn make_menu(&self, request: &MenuRequest<'_>) -> String {
        render_menu_html(&self.menu_entries(request))
    }

    /// Menu as a component tree; `None` unless `menu=1` is requested
    #[must_use]
    pub fn make_menu_tree(&self, request: &MenuRequest<'_>) -> Option<Component> {
        render_menu_tree(&self.menu_entries(request))
    }
}
