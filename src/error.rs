//! Error types for memchat.

use std::io;
use thiserror::Error;

/// Result type alias for memchat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in memchat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The summarizer failed to produce a summary.
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// The responder failed to produce a reply.
    #[error("Reply failed: {0}")]
    Responder(String),

    /// A fresh session id kept colliding with persisted ids.
    #[error("Session id collision: {0}")]
    IdCollision(String),

    /// Session not found.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session has already been closed.
    #[error("Session is closed: {0}")]
    SessionClosed(String),

    /// Unknown message role.
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
