//! Playground UI Helpers
//!
//! View-side building blocks shared by the playthings:
//! - [`Component`] trees for the reactive UI framework
//! - Chart [`Figure`] builders
//! - Relative-time text

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod charts;
pub mod component;
pub mod text;

pub use charts::{force_plot, ChartError, Figure, ForcePlotLabels};
pub use component::{escape_html, Component, Node, HTML_NAMESPACE};
pub use text::{ago_text, ago_text_at, lang_periods, LangPeriods};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
