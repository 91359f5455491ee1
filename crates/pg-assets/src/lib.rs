//! Playground Asset Layer
//!
//! The boundary between configuration/asset files on disk and the typed
//! values the playthings work with.
//!
//! # Core Operations
//!
//! - **JSON**: [`read_json_file`] with not-found vs. parse-error handling
//!   and an optional soft-error mode that returns the parser message
//! - **CSV**: [`read_records`] (string rows) and [`read_frame`] (typed columns)
//! - **Markdown**: [`read_markdown`], [`render_html`], [`substitute_placeholders`]
//! - **Objects**: [`read_object`] for bincode-encoded application types
//!
//! # Example
//!
//! ```rust,ignore
//! use pg_assets::{read_json_file, JsonRead};
//!
//! match read_json_file("../Config/quiz/intro.json", true) {
//!     JsonRead::Value(doc) => println!("title: {}", doc["title"]),
//!     JsonRead::ParseError(msg) => eprintln!("broken: {msg}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod json;
pub mod kind;
pub mod markdown;
pub mod object;
pub mod table;

// Re-exports for convenience
pub use error::{AssetError, AssetResult};
pub use json::{empty_object, merge_json, read_json_file, read_json_value, try_read_json, JsonRead};
pub use kind::AssetKind;
pub use markdown::{read_markdown, render_html, substitute_placeholders};
pub use object::{read_object, write_object};
pub use table::{read_frame, read_records, Cell, Column, ColumnType, DataFrame, Record};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with assets
    pub use crate::error::{AssetError, AssetResult};
    pub use crate::json::{read_json_file, JsonRead};
    pub use crate::kind::AssetKind;
    pub use crate::table::{ColumnType, DataFrame, Record};
}
