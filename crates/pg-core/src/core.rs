//! Plaything core
//!
//! [`Core`] is built once per process for one plaything. It locates the
//! configuration tree, reads the layered core configuration, discovers the
//! available specification IDs and, when activity logging is enabled,
//! connects the activity store. After construction it is read-only.

use crate::activity::{ActivityRecord, ActivityStore, CosmosContainer, SessionStore, SESSION_ID_KEY};
use crate::config::{CoreConfig, CORE_CONFIG_FILE};
use crate::error::{CoreError, CoreResult};
use crate::host::HostEnvironment;
use crate::specification::Specification;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key-set selector type for [`AssetCheck::FromDetail`]
pub type DetailKeys = dyn Fn(&Value) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> + Send + Sync;

/// Required asset keys for [`Core::get_specifications`]
#[derive(Clone)]
pub enum AssetCheck {
    /// The same keys for every specification
    Keys(Vec<String>),
    /// Keys derived from each specification's `detail`; an error yields no keys
    FromDetail(Arc<DetailKeys>),
}

impl Default for AssetCheck {
    fn default() -> Self {
        Self::Keys(Vec::new())
    }
}

impl AssetCheck {
    /// Fixed key list
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// Keys computed from `detail`
    pub fn from_detail<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> + Send + Sync + 'static,
    {
        Self::FromDetail(Arc::new(f))
    }

    fn resolve(&self, specification: &Specification) -> Vec<String> {
        match self {
            Self::Keys(keys) => keys.clone(),
            Self::FromDetail(f) => f(specification.detail()).unwrap_or_else(|e| {
                tracing::warn!(
                    "Could not derive asset keys for specification {}: {}",
                    specification.specification_id(),
                    e
                );
                Vec::new()
            }),
        }
    }
}

impl fmt::Debug for AssetCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keys(keys) => f.debug_tuple("Keys").field(keys).finish(),
            Self::FromDetail(_) => f.write_str("FromDetail(..)"),
        }
    }
}

/// Construction options for [`Core`]
#[derive(Debug, Clone, Default)]
pub struct CoreOptions {
    config_base: Option<PathBuf>,
    environment: Option<HostEnvironment>,
    activity_store: Option<Arc<dyn ActivityStore>>,
}

impl CoreOptions {
    /// Default options: process environment, standard config location
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the configuration base path
    #[must_use]
    pub fn with_config_base(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_base = Some(path.into());
        self
    }

    /// Use this environment instead of the process environment
    #[must_use]
    pub fn with_environment(mut self, env: HostEnvironment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Use this store instead of connecting the configured one
    #[must_use]
    pub fn with_activity_store(mut self, store: Arc<dyn ActivityStore>) -> Self {
        self.activity_store = Some(store);
        self
    }
}

/// Process-wide facade for one plaything
#[derive(Debug)]
pub struct Core {
    plaything_name: String,
    environment: HostEnvironment,
    config_base_path: PathBuf,
    config_plaything_path: PathBuf,
    core_config: CoreConfig,
    specification_ids: Vec<String>,
    plaything_root: String,
    activity_store: Option<Arc<dyn ActivityStore>>,
}

/// `*.json` stems in `dir`, sorted, without the core configuration
fn discover_specification_ids(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let core_stem = CORE_CONFIG_FILE.trim_end_matches(".json");
    let mut ids: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().to_str().and_then(|n| n.strip_suffix(".json")).map(str::to_string))
        .filter(|id| id != core_stem)
        .collect();
    ids.sort();
    ids
}

impl Core {
    /// Initialise from the process environment
    ///
    /// # Errors
    /// [`CoreError::ConfigBaseMissing`] if the configuration base is absent.
    pub fn new(plaything_name: impl Into<String>) -> CoreResult<Self> {
        Self::with_options(plaything_name, CoreOptions::default())
    }

    /// Initialise with explicit options
    ///
    /// # Errors
    /// [`CoreError::ConfigBaseMissing`] if the configuration base is absent.
    pub fn with_options(plaything_name: impl Into<String>, options: CoreOptions) -> CoreResult<Self> {
        let plaything_name = plaything_name.into();
        let environment = options.environment.unwrap_or_else(HostEnvironment::from_process);

        let config_base_path = options
            .config_base
            .unwrap_or_else(|| environment.default_config_base());
        if !config_base_path.exists() {
            let shown = std::env::current_dir().map_or_else(|_| config_base_path.clone(), |cwd| cwd.join(&config_base_path));
            tracing::error!("Failed to find config base path at: {}", shown.display());
            return Err(CoreError::ConfigBaseMissing(config_base_path));
        }
        let config_plaything_path = config_base_path.join(&plaything_name);

        let core_config = CoreConfig::load(&config_base_path, &plaything_name);

        let specification_ids = discover_specification_ids(&config_plaything_path);
        if specification_ids.is_empty() {
            tracing::warn!("No specifications found at: {}", config_plaything_path.display());
        }

        let plaything_root = core_config.plaything_root(&plaything_name);

        let activity_store = match options.activity_store {
            Some(store) => Some(store),
            None if core_config.activity.enabled => {
                match CosmosContainer::connect(&environment, &core_config.activity, &plaything_name) {
                    Ok(container) => Some(Arc::new(container) as Arc<dyn ActivityStore>),
                    Err(e) => {
                        tracing::error!("Failed to set up activity logging: {}", e);
                        None
                    }
                }
            }
            None => {
                tracing::warn!("Activity logging is disabled. Refer to core_config.json.");
                None
            }
        };

        Ok(Self {
            plaything_name,
            environment,
            config_base_path,
            config_plaything_path,
            core_config,
            specification_ids,
            plaything_root,
            activity_store,
        })
    }

    #[inline]
    #[must_use]
    pub fn plaything_name(&self) -> &str {
        &self.plaything_name
    }

    /// Running as a managed function app
    #[inline]
    #[must_use]
    pub fn is_function_app(&self) -> bool {
        self.environment.is_managed_hosting()
    }

    #[inline]
    #[must_use]
    pub fn environment(&self) -> &HostEnvironment {
        &self.environment
    }

    #[inline]
    #[must_use]
    pub fn config_base_path(&self) -> &Path {
        &self.config_base_path
    }

    /// Directory holding this plaything's specifications
    #[inline]
    #[must_use]
    pub fn config_plaything_path(&self) -> &Path {
        &self.config_plaything_path
    }

    #[inline]
    #[must_use]
    pub fn core_config(&self) -> &CoreConfig {
        &self.core_config
    }

    /// Discovered specification IDs, sorted
    #[inline]
    #[must_use]
    pub fn specification_ids(&self) -> &[String] {
        &self.specification_ids
    }

    /// URL path prefix, empty or `/{plaything}`
    #[inline]
    #[must_use]
    pub fn plaything_root(&self) -> &str {
        &self.plaything_root
    }

    /// Keep-warm timer enabled
    #[inline]
    #[must_use]
    pub fn keep_warm(&self) -> bool {
        self.core_config.keep_warm
    }

    /// Activity store in use, if any
    #[inline]
    #[must_use]
    pub fn activity_store(&self) -> Option<&Arc<dyn ActivityStore>> {
        self.activity_store.as_ref()
    }

    /// Load a specification afresh
    ///
    /// With `check_known`, an ID that was not discovered at start-up is
    /// reported as [`CoreError::UnknownSpecification`].
    ///
    /// # Errors
    /// Returns error only for an unknown ID when `check_known` is set.
    pub fn get_specification(&self, specification_id: &str, check_known: bool) -> CoreResult<Specification> {
        if check_known && !self.specification_ids.iter().any(|id| id == specification_id) {
            let err = CoreError::unknown_specification(&self.plaything_name, specification_id);
            tracing::warn!("{}", err);
            return Err(err);
        }
        Ok(Specification::load(&self.config_plaything_path, specification_id))
    }

    /// Load every discovered specification
    ///
    /// Disabled ones are skipped unless `include_disabled`. When any asset
    /// keys are requested, problems are appended to each summary.
    #[must_use]
    pub fn get_specifications(
        &self,
        include_disabled: bool,
        check_assets: &AssetCheck,
        check_optional_assets: &[&str],
    ) -> Vec<Specification> {
        let mut specifications = Vec::new();
        for id in &self.specification_ids {
            let mut spec = Specification::load(&self.config_plaything_path, id.as_str());
            if !(include_disabled || spec.enabled()) {
                continue;
            }
            let required = check_assets.resolve(&spec);
            if !required.is_empty() || !check_optional_assets.is_empty() {
                let required: Vec<&str> = required.iter().map(String::as_str).collect();
                spec.check_assets(&required, check_optional_assets, true);
            }
            specifications.push(spec);
        }
        specifications
    }

    /// Record one interaction
    ///
    /// A session ID is created in `session` on first use. A failed store
    /// write is logged and does not fail the caller.
    pub fn record_activity(
        &self,
        plaything_part: &str,
        specification_id: &str,
        session: &mut dyn SessionStore,
        activity: Option<Map<String, Value>>,
        referrer: Option<&str>,
        tag: Option<&str>,
    ) -> ActivityRecord {
        let session_id = match session.get_value(SESSION_ID_KEY) {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                session.set_value(SESSION_ID_KEY, id.clone());
                tracing::info!("Create new session id: {}", id);
                id
            }
        };

        let record = ActivityRecord {
            plaything_name: self.plaything_name.clone(),
            plaything_part: plaything_part.to_string(),
            specification_id: specification_id.to_string(),
            session_id,
            referrer: referrer.map(str::to_string),
            tag: tag.map(str::to_string),
            activity: activity.unwrap_or_default(),
        };
        let document = record.to_document();

        if let Some(store) = &self.activity_store {
            if let Err(e) = store.create_item(&document) {
                tracing::error!("Failed to write activity record: {}", e);
            }
        }

        if self.core_config.relay_activity {
            let line = Value::Object(document);
            tracing::info!("{}", line);
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::MemoryActivityStore;
    use std::collections::HashMap;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("quiz")).unwrap();
        fs::write(dir.path().join("quiz").join("b.json"), r#"{"title": "B", "enabled": true}"#).unwrap();
        fs::write(dir.path().join("quiz").join("a.json"), r#"{"title": "A"}"#).unwrap();
        fs::write(dir.path().join("quiz").join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("quiz").join(CORE_CONFIG_FILE), r#"{"keep_warm": true}"#).unwrap();
        dir
    }

    fn core(dir: &Path) -> Core {
        let options = CoreOptions::new()
            .with_config_base(dir)
            .with_environment(HostEnvironment::default());
        Core::with_options("quiz", options).unwrap()
    }

    #[test]
    fn missing_base_is_error() {
        let options = CoreOptions::new()
            .with_config_base("/definitely/not/here")
            .with_environment(HostEnvironment::default());
        let err = Core::with_options("quiz", options).unwrap_err();
        assert!(matches!(err, CoreError::ConfigBaseMissing(_)));
    }

    #[test]
    fn discovers_sorted_ids_without_core_config() {
        let dir = tree();
        let core = core(dir.path());
        assert_eq!(core.specification_ids(), ["a".to_string(), "b".to_string()]);
        assert!(core.keep_warm());
        assert_eq!(core.plaything_root(), "");
        assert!(!core.is_function_app());
        assert!(core.activity_store().is_none());
    }

    #[test]
    fn unknown_id_only_when_checked() {
        let dir = tree();
        let core = core(dir.path());
        let err = core.get_specification("zzz", true).unwrap_err();
        assert_eq!(err.status_code(), 404);

        let spec = core.get_specification("zzz", false).unwrap();
        assert_eq!(spec.title(), "Nothing found for specification id = zzz.");
        assert_eq!(core.get_specification("a", true).unwrap().title(), "A");
    }

    #[test]
    fn enabled_filter() {
        let dir = tree();
        let core = core(dir.path());
        let enabled = core.get_specifications(false, &AssetCheck::default(), &[]);
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].title(), "B");
        assert_eq!(core.get_specifications(true, &AssetCheck::default(), &[]).len(), 2);
    }

    #[test]
    fn failing_selector_degrades_to_no_keys() {
        let dir = tree();
        let core = core(dir.path());
        let check = AssetCheck::from_detail(|_| Err("no keys".into()));
        let specs = core.get_specifications(false, &check, &[]);
        assert_eq!(specs[0].summary(), "");

        let specs = core.get_specifications(false, &AssetCheck::keys(["data"]), &[]);
        assert_eq!(
            specs[0].summary(),
            " *** Asset map issues: data - missing from specification."
        );
    }

    #[test]
    fn session_id_reused() {
        let dir = tree();
        let store = Arc::new(MemoryActivityStore::new());
        let options = CoreOptions::new()
            .with_config_base(dir.path())
            .with_environment(HostEnvironment::default())
            .with_activity_store(store.clone());
        let core = Core::with_options("quiz", options).unwrap();

        let mut session: HashMap<String, String> = HashMap::new();
        let first = core.record_activity("intro", "a", &mut session, None, None, None);
        let second = core.record_activity("end", "a", &mut session, None, Some("https://ref"), Some("m"));

        assert_eq!(first.session_id, second.session_id);
        assert_eq!(session[SESSION_ID_KEY], first.session_id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[1]["referrer"], Value::from("https://ref"));
    }
}
