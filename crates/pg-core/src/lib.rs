//! Playground Core
//!
//! Configuration resolution for plaything web apps.
//!
//! # Architecture
//!
//! ```text
//! {config_base}/
//!   core_config.json          global settings
//!   {plaything}/
//!     core_config.json        optional per-plaything override
//!     {specification_id}.json one per specification
//!     assets/                 files named by each asset map
//! ```
//!
//! [`Core`] is built once per process and discovers the specification IDs;
//! each request loads a fresh [`Specification`], whose typed loaders read the
//! mapped assets. [`Core::record_activity`] logs one event per request.
//!
//! # Example
//!
//! ```rust,ignore
//! use pg_core::{init_logging, Core, HostEnvironment};
//!
//! let env = HostEnvironment::from_process();
//! let _guard = init_logging(&env, "quiz", None)?;
//! let core = Core::new("quiz")?;
//! let spec = core.get_specification("intro", true)?;
//! println!("{}: {}", spec.title(), spec.summary());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod activity;
pub mod config;
pub mod core;
pub mod error;
pub mod error_page;
pub mod host;
pub mod keep_warm;
pub mod langstrings;
pub mod logging;
pub mod menu;
pub mod specification;

pub use activity::{ActivityRecord, ActivityStore, CosmosContainer, MemoryActivityStore, SessionStore, SESSION_ID_KEY};
pub use config::{ActivityConfig, CoreConfig, CORE_CONFIG_FILE};
pub use crate::core::{AssetCheck, Core, CoreOptions};
pub use error::{ActivityError, CoreError, CoreResult, PingError};
pub use error_page::ErrorPage;
pub use host::HostEnvironment;
pub use keep_warm::{ping, PingOutcome};
pub use langstrings::LangStrings;
pub use logging::{init_logging, LoggingError};
pub use menu::{render_menu_html, render_menu_tree, resolve_menu, MenuDefinition, MenuEntry, MenuRequest};
pub use specification::{MenuItems, Specification, SpecificationDocument};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
