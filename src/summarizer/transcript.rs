//! Built-in extractive summarizer.

use crate::core::{ChatSession, Role};
use crate::error::Result;
use crate::summarizer::{DEFAULT_MAX_WORDS, EMPTY_SESSION_SUMMARY, Summarizer};

/// Words quoted from an individual user message.
const QUOTE_WORDS: usize = 25;

/// Offline summarizer that describes a session from its own messages.
///
/// Used when no external summarizer is configured.
#[derive(Debug, Clone)]
pub struct TranscriptSummarizer {
    max_words: usize,
}

impl TranscriptSummarizer {
    /// Create a summarizer that caps its output at `max_words` words.
    #[must_use]
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
        }
    }
}

impl Default for TranscriptSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

impl Summarizer for TranscriptSummarizer {
    fn generate_summary(&self, session: &ChatSession) -> Result<String> {
        if session.messages.is_empty() {
            return Ok(EMPTY_SESSION_SUMMARY.to_string());
        }

        let user: Vec<&str> = session
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();
        let replies = session
            .messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count();

        let mut text = format!(
            "{} user message(s) and {replies} assistant reply(ies).",
            user.len()
        );
        if let Some(first) = user.first() {
            text.push_str(&format!(" Opened with: \"{}\".", take_words(first, QUOTE_WORDS)));
        }
        if let Some(last) = user.get(1..).and_then(<[&str]>::last) {
            text.push_str(&format!(" Ended with: \"{}\".", take_words(last, QUOTE_WORDS)));
        }

        Ok(take_words(&text, self.max_words))
    }
}

/// First `limit` whitespace-separated words, with `...` if any were dropped.
fn take_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        words.join(" ")
    } else {
        format!("{}...", words[..limit].join(" "))
    }
}
