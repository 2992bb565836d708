//! CLI command implementations.

pub mod chat;
pub mod clean;
pub mod context;
pub mod list;
pub mod session;
pub mod show;
pub mod stats;

use crate::config::Config;
use crate::core::{ChatSession, SessionStore};
use crate::error::{Error, Result};
use crate::storage::FileBackend;

/// Open the file-backed store described by `config`.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be created.
pub fn open_store(config: &Config) -> Result<SessionStore> {
    let backend = FileBackend::new(config.storage.path.clone())?;
    Ok(SessionStore::new(backend, config.summarizer.build()))
}

/// Load a session or report it as missing.
fn require_session(store: &SessionStore, session_id: &str) -> Result<ChatSession> {
    store
        .load_session(session_id)
        .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))
}
