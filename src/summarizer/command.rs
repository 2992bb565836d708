//! Summarizer backed by an external program.

use crate::core::ChatSession;
use crate::error::{Error, Result};
use crate::process::pipe_through;
use crate::summarizer::{EMPTY_SESSION_SUMMARY, Summarizer, format_transcript, summary_prompt};

/// Runs a configured command with the summary prompt on stdin and takes its
/// trimmed stdout as the summary.
///
/// Any model CLI that reads a prompt from stdin works here.
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    program: String,
    args: Vec<String>,
    max_words: usize,
}

impl CommandSummarizer {
    /// Create a summarizer that runs `program` with `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, max_words: usize) -> Self {
        Self {
            program: program.into(),
            args,
            max_words,
        }
    }

    /// Program this summarizer runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Summarizer for CommandSummarizer {
    fn generate_summary(&self, session: &ChatSession) -> Result<String> {
        if session.messages.is_empty() {
            return Ok(EMPTY_SESSION_SUMMARY.to_string());
        }

        let prompt = summary_prompt(&format_transcript(&session.messages), self.max_words);

        let summary =
            pipe_through(&self.program, &self.args, prompt).map_err(Error::Summarization)?;

        tracing::info!(session_id = %session.session_id, program = %self.program, "generated summary");
        Ok(summary)
    }
}
