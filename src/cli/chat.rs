//! `memchat chat` command implementation.

use crate::cli::require_session;
use crate::core::{ChatSession, Role, SessionStore};
use crate::error::{Error, Result};
use crate::responder::Responder;

/// Run the chat command.
///
/// Sends the user's message with the session's context to the responder,
/// records both turns, and prints the reply.
///
/// # Errors
///
/// Returns an error if the session is missing or closed, the responder
/// fails, or the session cannot be saved.
pub fn run(
    store: &SessionStore,
    responder: &dyn Responder,
    session_id: &str,
    content: &str,
) -> Result<()> {
    let session = exchange(store, responder, session_id, content)?;

    if let Some(reply) = session.messages.last() {
        println!("{}", reply.content);
    }
    Ok(())
}

/// One user turn and its reply. Nothing is saved if the responder fails.
fn exchange(
    store: &SessionStore,
    responder: &dyn Responder,
    session_id: &str,
    content: &str,
) -> Result<ChatSession> {
    let mut session = require_session(store, session_id)?;
    if !session.is_active {
        return Err(Error::SessionClosed(session_id.to_string()));
    }

    store.append_message(&mut session, Role::User, content);
    let reply = responder.generate_reply(&session)?;
    store.append_message(&mut session, Role::Assistant, reply);
    store.save_session(&session)?;

    Ok(session)
}
