//! memchat - chat sessions with summary-based memory.
//!
//! Sessions are stored as a JSON collection; closing a session writes a
//! summary that later sessions can carry as context.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
mod process;
pub mod responder;
pub mod storage;
pub mod summarizer;

pub use config::Config;
pub use crate::core::{ChatSession, Message, Role, SessionStore, SessionSummary, StorageStats};
pub use error::{Error, Result};
