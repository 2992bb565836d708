//! Session summarizers.
//!
//! A summarizer turns a closed session's transcript into the short text that
//! later sessions receive as memory. The store treats it as an opaque,
//! blocking call.

pub mod command;
pub mod transcript;

pub use command::CommandSummarizer;
pub use transcript::TranscriptSummarizer;

use crate::core::{ChatSession, Message, Role};
use crate::error::Result;

/// Summary used for sessions that never received a message.
pub const EMPTY_SESSION_SUMMARY: &str = "Empty session with no messages.";

/// Default word limit requested from summarizers.
pub const DEFAULT_MAX_WORDS: usize = 200;

/// Produces a summary for a session.
pub trait Summarizer: Send + Sync {
    /// Summarize the session's transcript.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Summarization`] if no summary could be produced.
    fn generate_summary(&self, session: &ChatSession) -> Result<String>;
}

impl<S: Summarizer + ?Sized> Summarizer for Box<S> {
    fn generate_summary(&self, session: &ChatSession) -> Result<String> {
        (**self).generate_summary(session)
    }
}

/// Render the transcript as `User: ...` / `Assistant: ...` lines.
///
/// System messages are left out.
#[must_use]
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .filter_map(|m| match m.role {
            Role::System => None,
            Role::User => Some(format!("User: {}", m.content)),
            Role::Assistant => Some(format!("Assistant: {}", m.content)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the instruction sent to a model-backed summarizer.
#[must_use]
pub fn summary_prompt(transcript: &str, max_words: usize) -> String {
    format!(
        "Please provide a concise summary of the following conversation.\n\
         Focus on the main topics discussed, key questions asked, and important information shared.\n\
         Keep the summary under {max_words} words.\n\
         \n\
         Conversation:\n\
         {transcript}\n\
         \n\
         Summary:\n"
    )
}
