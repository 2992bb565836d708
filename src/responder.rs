//! Assistant replies from an external model program.

use crate::core::ChatSession;
use crate::error::{Error, Result};
use crate::process::pipe_through;
use serde_json::{Value, json};

/// Produces the assistant's next turn for a session.
pub trait Responder: Send + Sync {
    /// Generate a reply to the session's conversation so far.
    ///
    /// # Errors
    ///
    /// Returns `Error::Responder` if no reply could be produced.
    fn generate_reply(&self, session: &ChatSession) -> Result<String>;
}

/// Conversation turns as `{"role", "content"}` objects, memory turn first.
#[must_use]
pub fn context_messages(session: &ChatSession) -> Value {
    Value::Array(
        session
            .conversation_history()
            .into_iter()
            .map(|(role, content)| json!({ "role": role.as_str(), "content": content }))
            .collect(),
    )
}

/// Runs a configured command with the conversation as a JSON message list on
/// stdin and takes its trimmed stdout as the reply.
#[derive(Debug, Clone)]
pub struct CommandResponder {
    program: String,
    args: Vec<String>,
}

impl CommandResponder {
    /// Create a responder that runs `program` with `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Responder for CommandResponder {
    fn generate_reply(&self, session: &ChatSession) -> Result<String> {
        let input = serde_json::to_string(&context_messages(session))?;
        let reply = pipe_through(&self.program, &self.args, input).map_err(Error::Responder)?;

        tracing::info!(session_id = %session.session_id, program = %self.program, "generated reply");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Message, Role};
    use chrono::Utc;

    fn session_with_message() -> ChatSession {
        let now = Utc::now();
        let mut session = ChatSession::new("r0000001", now, false, Vec::new());
        session.add_message(Message::new(Role::User, "what is a lifetime", now));
        session
    }

    #[test]
    fn context_lists_messages_in_order() {
        let now = Utc::now();
        let mut session = ChatSession::new("r0000002", now, false, Vec::new());
        session.add_message(Message::new(Role::User, "hi", now));
        session.add_message(Message::new(Role::Assistant, "hello", now));

        assert_eq!(
            context_messages(&session),
            json!([
                { "role": "user", "content": "hi" },
                { "role": "assistant", "content": "hello" }
            ])
        );
    }

    #[cfg(unix)]
    fn sh(script: &str) -> CommandResponder {
        CommandResponder::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[cfg(unix)]
    #[test]
    fn reply_is_trimmed_stdout() {
        let reply = sh("cat > /dev/null; echo '  a scope for borrows  '")
            .generate_reply(&session_with_message())
            .unwrap();
        assert_eq!(reply, "a scope for borrows");
    }

    #[cfg(unix)]
    #[test]
    fn conversation_is_sent_as_json() {
        let sent = CommandResponder::new("cat", Vec::new())
            .generate_reply(&session_with_message())
            .unwrap();
        let sent: Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(sent, json!([{ "role": "user", "content": "what is a lifetime" }]));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_an_error() {
        let err = sh("cat > /dev/null; echo overloaded >&2; exit 1")
            .generate_reply(&session_with_message())
            .unwrap_err();
        assert!(matches!(err, Error::Responder(msg) if msg.contains("overloaded")));
    }

    #[cfg(unix)]
    #[test]
    fn empty_output_is_an_error() {
        let err = sh("cat > /dev/null")
            .generate_reply(&session_with_message())
            .unwrap_err();
        assert!(matches!(err, Error::Responder(msg) if msg.contains("no output")));
    }
}
