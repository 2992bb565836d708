//! Storage trait definitions.

use crate::core::{ChatSession, SessionSummary};
use crate::error::Result;
use indexmap::IndexMap;

/// A whole collection keyed by session id, in first-insert order.
pub type Records<T> = IndexMap<String, T>;

/// Storage backend for the `sessions` and `summaries` collections.
///
/// Each collection is read and written as a unit. A `store_*` call replaces
/// the previous contents entirely or fails without touching them.
pub trait CollectionStore: Send + Sync {
    /// Load every stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection exists but cannot be read or parsed.
    fn load_sessions(&self) -> Result<Records<ChatSession>>;

    /// Replace the sessions collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be serialized or written.
    fn store_sessions(&self, sessions: &Records<ChatSession>) -> Result<()>;

    /// Load every stored summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection exists but cannot be read or parsed.
    fn load_summaries(&self) -> Result<Records<SessionSummary>>;

    /// Replace the summaries collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be serialized or written.
    fn store_summaries(&self, summaries: &Records<SessionSummary>) -> Result<()>;

    /// Human-readable description of where the collections live.
    fn location(&self) -> String;
}
