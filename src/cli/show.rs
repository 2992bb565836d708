//! `memchat show` command implementation.

use crate::cli::require_session;
use crate::core::SessionStore;
use crate::error::Result;

/// Run the show command.
///
/// Prints the stored session as JSON.
///
/// # Errors
///
/// Returns an error if the session is not found.
pub fn run(store: &SessionStore, session_id: &str) -> Result<()> {
    let session = require_session(store, session_id)?;

    let json = serde_json::to_string_pretty(&session)?;
    println!("{json}");

    Ok(())
}
