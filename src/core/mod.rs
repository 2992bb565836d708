//! Core session types and the session lifecycle.

pub mod clock;
pub mod session;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use session::{ChatSession, Message, Role, SessionSummary};
pub use store::{DEFAULT_KEEP_COUNT, SessionStore, StorageStats};
