//! Chat session types.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation.
    User,

    /// The model's reply.
    Assistant,

    /// Instructions or injected context.
    System,
}

impl Role {
    /// Lowercase wire name, as stored on disk and sent to models.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            other => Err(Error::InvalidRole(other.to_string())),
        }
    }
}

/// A single message in a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Message author.
    pub role: Role,

    /// Message text.
    pub content: String,

    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the given time.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }
}

/// Summary written when a session is closed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    /// Session this summary describes.
    pub session_id: String,

    /// Summary text produced by the summarizer.
    pub summary: String,

    /// Number of messages in the session at close time.
    pub message_count: usize,

    /// When the session started.
    pub start_time: DateTime<Utc>,

    /// When the session was closed.
    pub end_time: DateTime<Utc>,
}

/// A chat session and its transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSession {
    /// Short session identifier.
    pub session_id: String,

    /// Messages in append order.
    pub messages: Vec<Message>,

    /// When the session was created.
    pub start_time: DateTime<Utc>,

    /// False once the session has been closed.
    pub is_active: bool,

    /// Whether earlier summaries are carried into this session.
    pub memory_enabled: bool,

    /// Summaries captured at creation time, most recent first.
    pub previous_summaries: Vec<SessionSummary>,
}

/// Prefix of the system turn that carries earlier sessions into a new one.
const CONTEXT_PREFIX: &str = "Previous conversation context: ";

impl ChatSession {
    /// Create an active session with no messages.
    #[must_use]
    pub fn new(
        session_id: &str,
        start_time: DateTime<Utc>,
        memory_enabled: bool,
        previous_summaries: Vec<SessionSummary>,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            messages: Vec::new(),
            start_time,
            is_active: true,
            memory_enabled,
            previous_summaries,
        }
    }

    /// Append a message to the transcript.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Conversation as `(role, content)` turns for a chat model.
    ///
    /// When memory is enabled and earlier summaries exist, the first turn is a
    /// system message combining them.
    #[must_use]
    pub fn conversation_history(&self) -> Vec<(Role, String)> {
        let mut history = Vec::with_capacity(self.messages.len() + 1);

        if self.memory_enabled {
            if let Some(combined) = self.combined_summaries() {
                history.push((Role::System, format!("{CONTEXT_PREFIX}{combined}")));
            }
        }

        history.extend(
            self.messages
                .iter()
                .map(|m| (m.role, m.content.clone())),
        );
        history
    }

    /// Earlier summaries joined into one line, or `None` if there are none.
    fn combined_summaries(&self) -> Option<String> {
        if self.previous_summaries.is_empty() {
            return None;
        }

        let parts: Vec<String> = self
            .previous_summaries
            .iter()
            .map(|s| format!("Session {}: {}", s.session_id, s.summary))
            .collect();
        Some(parts.join(" | "))
    }
}
