//! Activity recording
//!
//! Each request may log one [`ActivityRecord`]. Records go to an
//! [`ActivityStore`] when one is configured and to the process log when
//! relaying is on.

pub mod cosmos;
pub mod record;
pub mod store;

pub use cosmos::{sign_request, CosmosContainer};
pub use record::{ActivityRecord, SessionStore, SESSION_ID_KEY};
pub use store::{ActivityStore, MemoryActivityStore};
