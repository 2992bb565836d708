//! `memchat context` command implementation.

use crate::cli::require_session;
use crate::core::SessionStore;
use crate::error::Result;
use crate::responder::context_messages;

/// Run the context command.
///
/// Prints the session as a chat-completion message list, including the
/// memory turn built from earlier summaries.
///
/// # Errors
///
/// Returns an error if the session is not found.
pub fn run(store: &SessionStore, session_id: &str) -> Result<()> {
    let session = require_session(store, session_id)?;

    let json = serde_json::to_string_pretty(&context_messages(&session))?;
    println!("{json}");

    Ok(())
}
