//! `memchat new`, `append`, `close` and `delete` command implementations.

use crate::cli::require_session;
use crate::core::{ChatSession, Role, SessionStore, SessionSummary};
use crate::error::{Error, Result};
use std::io;

/// Run the new command.
///
/// Creates a session, saves it, and prints its id.
///
/// # Errors
///
/// Returns an error if the session cannot be created or saved.
pub fn run_new(store: &SessionStore, memory_enabled: bool) -> Result<()> {
    let session = create(store, memory_enabled)?;

    println!("{}", session.session_id);
    if memory_enabled {
        eprintln!(
            "Loaded {} previous summary(ies) into session memory.",
            session.previous_summaries.len()
        );
    }
    Ok(())
}

/// Run the append command.
///
/// # Errors
///
/// Returns an error if the role is unknown, the session is missing or
/// closed, or the session cannot be saved.
pub fn run_append(store: &SessionStore, session_id: &str, role: &str, content: &str) -> Result<()> {
    let role: Role = role.parse()?;
    let session = append(store, session_id, role, content)?;

    println!(
        "Session {} now has {} message(s).",
        session.session_id,
        session.messages.len()
    );
    Ok(())
}

/// Run the close command.
///
/// # Errors
///
/// Returns an error if the session is missing or closing it fails.
pub fn run_close(store: &SessionStore, session_id: &str) -> Result<()> {
    let summary = close(store, session_id)?;

    println!(
        "Closed session {} ({} message(s)).",
        summary.session_id, summary.message_count
    );
    println!("\n{}", summary.summary);
    Ok(())
}

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if the session does not exist or could not be removed.
pub fn run_delete(store: &SessionStore, session_id: &str) -> Result<()> {
    require_session(store, session_id)?;
    if !store.delete_session(session_id) {
        return Err(Error::Storage(io::Error::other(format!(
            "could not delete session {session_id}"
        ))));
    }
    println!("Deleted session {session_id}. Its summary is kept until cleanup.");
    Ok(())
}

fn create(store: &SessionStore, memory_enabled: bool) -> Result<ChatSession> {
    let session = store.create_session(memory_enabled)?;
    store.save_session(&session)?;
    Ok(session)
}

fn append(store: &SessionStore, session_id: &str, role: Role, content: &str) -> Result<ChatSession> {
    let mut session = require_session(store, session_id)?;
    if !session.is_active {
        return Err(Error::SessionClosed(session_id.to_string()));
    }

    store.append_message(&mut session, role, content);
    store.save_session(&session)?;
    Ok(session)
}

fn close(store: &SessionStore, session_id: &str) -> Result<SessionSummary> {
    let mut session = require_session(store, session_id)?;
    store.close_session(&mut session)
}
