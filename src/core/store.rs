//! Session lifecycle over the `sessions` and `summaries` collections.
//!
//! Every mutation is a full read-modify-write of one collection, performed
//! under that collection's lock. Read paths degrade to empty results when a
//! collection cannot be read; write paths return their errors.

use crate::core::clock::{Clock, SystemClock};
use crate::core::session::{ChatSession, Message, Role, SessionSummary};
use crate::error::{Error, Result};
use crate::storage::{CollectionStore, Records};
use crate::summarizer::Summarizer;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Sessions kept by [`SessionStore::cleanup_old_sessions`] unless configured
/// otherwise.
pub const DEFAULT_KEEP_COUNT: usize = 50;

/// Length of generated session ids.
const SESSION_ID_LEN: usize = 8;

/// Fresh ids tried before giving up on a collision.
const MAX_ID_ATTEMPTS: usize = 8;

/// Aggregate counts over both collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Number of stored sessions.
    pub total_sessions: usize,

    /// Stored sessions that have not been closed.
    pub active_sessions: usize,

    /// Number of stored summaries.
    pub total_summaries: usize,

    /// Messages across all stored sessions.
    pub total_messages: usize,

    /// Where the collections live.
    pub storage_location: String,
}

/// Owns the session and summary collections and the session lifecycle.
pub struct SessionStore {
    backend: Box<dyn CollectionStore>,
    summarizer: Box<dyn Summarizer>,
    clock: Box<dyn Clock>,
    sessions_lock: Mutex<()>,
    summaries_lock: Mutex<()>,
}

impl SessionStore {
    /// Create a store over `backend` that summarizes with `summarizer` and
    /// reads the system clock.
    pub fn new(
        backend: impl CollectionStore + 'static,
        summarizer: impl Summarizer + 'static,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            summarizer: Box::new(summarizer),
            clock: Box::new(SystemClock),
            sessions_lock: Mutex::new(()),
            summaries_lock: Mutex::new(()),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Underlying storage backend.
    #[must_use]
    pub fn backend(&self) -> &dyn CollectionStore {
        self.backend.as_ref()
    }

    /// Create a new active session. Nothing is written until
    /// [`save_session`](Self::save_session).
    ///
    /// With `memory_enabled` (the usual choice) the session carries every
    /// stored summary, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdCollision`] if no unused id could be generated.
    pub fn create_session(&self, memory_enabled: bool) -> Result<ChatSession> {
        let existing = or_degraded("load sessions", self.backend.load_sessions());
        let session_id = pick_session_id(&existing, generate_session_id)?;

        let previous_summaries = if memory_enabled {
            self.get_session_summaries()
        } else {
            Vec::new()
        };

        let session = ChatSession::new(
            &session_id,
            self.clock.now(),
            memory_enabled,
            previous_summaries,
        );

        tracing::info!(session_id = %session.session_id, memory_enabled, "created session");
        Ok(session)
    }

    /// Append a message stamped with the current time.
    pub fn append_message(&self, session: &mut ChatSession, role: Role, content: impl Into<String>) {
        session.add_message(Message::new(role, content, self.clock.now()));
    }

    /// Insert or overwrite the session in the sessions collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or rewritten.
    pub fn save_session(&self, session: &ChatSession) -> Result<()> {
        let _guard = lock(&self.sessions_lock);

        let result = self.backend.load_sessions().and_then(|mut sessions| {
            sessions.insert(session.session_id.clone(), session.clone());
            self.backend.store_sessions(&sessions)
        });

        match &result {
            Ok(()) => tracing::info!(session_id = %session.session_id, "saved session"),
            Err(e) => {
                tracing::error!(session_id = %session.session_id, error = %e, "failed to save session");
            }
        }
        result
    }

    /// Load a stored session.
    ///
    /// Returns `None` if the session is absent or the collection is unreadable.
    #[must_use]
    pub fn load_session(&self, session_id: &str) -> Option<ChatSession> {
        let mut sessions = or_degraded("load sessions", self.backend.load_sessions());
        let session = sessions.shift_remove(session_id);
        if session.is_none() {
            tracing::warn!(session_id, "session not found");
        }
        session
    }

    /// Close the session: summarize it, store the summary, and store the
    /// session as inactive.
    ///
    /// `session.is_active` only becomes `false` once both writes succeed. If
    /// the session write fails, the summary entry is put back the way it was.
    ///
    /// # Errors
    ///
    /// Returns an error if summarization or either write fails.
    pub fn close_session(&self, session: &mut ChatSession) -> Result<SessionSummary> {
        let mut closed = session.clone();
        closed.is_active = false;

        let text = self.summarizer.generate_summary(&closed).inspect_err(|e| {
            tracing::error!(session_id = %closed.session_id, error = %e, "failed to summarize session");
        })?;

        let summary = SessionSummary {
            session_id: closed.session_id.clone(),
            summary: text,
            message_count: closed.messages.len(),
            start_time: closed.start_time,
            end_time: self.clock.now().max(closed.start_time),
        };

        let previous = self.upsert_summary(&summary)?;

        if let Err(e) = self.save_session(&closed) {
            self.restore_summary(&summary.session_id, previous);
            return Err(e);
        }

        session.is_active = false;
        tracing::info!(session_id = %summary.session_id, messages = summary.message_count, "closed session");
        Ok(summary)
    }

    /// Ids of every stored session, in first-save order.
    #[must_use]
    pub fn get_session_history(&self) -> Vec<String> {
        or_degraded("load sessions", self.backend.load_sessions())
            .into_keys()
            .collect()
    }

    /// Stored sessions that are still active.
    #[must_use]
    pub fn get_active_sessions(&self) -> Vec<ChatSession> {
        or_degraded("load sessions", self.backend.load_sessions())
            .into_values()
            .filter(|s| s.is_active)
            .collect()
    }

    /// Remove a session. Its summary is kept.
    ///
    /// Returns `true` if the session existed and the collection was
    /// rewritten without it.
    pub fn delete_session(&self, session_id: &str) -> bool {
        let _guard = lock(&self.sessions_lock);

        let mut sessions = match self.backend.load_sessions() {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!(session_id, error = %e, "failed to load sessions for deletion");
                return false;
            }
        };

        if sessions.shift_remove(session_id).is_none() {
            tracing::warn!(session_id, "session not found for deletion");
            return false;
        }

        match self.backend.store_sessions(&sessions) {
            Ok(()) => {
                tracing::info!(session_id, "deleted session");
                true
            }
            Err(e) => {
                tracing::error!(session_id, error = %e, "failed to delete session");
                false
            }
        }
    }

    /// Every stored summary, most recent `end_time` first.
    #[must_use]
    pub fn get_session_summaries(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> =
            or_degraded("load summaries", self.backend.load_summaries())
                .into_values()
                .collect();
        summaries.sort_by(|a, b| b.end_time.cmp(&a.end_time));
        summaries
    }

    /// Keep the `keep_count` most recently started sessions and drop the rest
    /// together with their summaries.
    ///
    /// Never fails: errors are logged and leave both collections as they were.
    /// Returns the number of sessions removed.
    pub fn cleanup_old_sessions(&self, keep_count: usize) -> usize {
        match self.try_cleanup(keep_count) {
            Ok(removed) => removed,
            Err(e) => {
                tracing::error!(keep_count, error = %e, "cleanup failed");
                0
            }
        }
    }

    fn try_cleanup(&self, keep_count: usize) -> Result<usize> {
        let _sessions_guard = lock(&self.sessions_lock);
        let sessions = self.backend.load_sessions()?;
        if sessions.len() <= keep_count {
            return Ok(0);
        }

        let _summaries_guard = lock(&self.summaries_lock);
        let mut summaries = self.backend.load_summaries()?;

        let mut ranked: Vec<(&String, &ChatSession)> = sessions.iter().collect();
        ranked.sort_by(|a, b| b.1.start_time.cmp(&a.1.start_time));
        let keep: HashSet<&str> = ranked
            .iter()
            .take(keep_count)
            .map(|(id, _)| id.as_str())
            .collect();

        let mut kept = Records::with_capacity(keep_count);
        let mut removed = Vec::new();
        for (id, session) in &sessions {
            if keep.contains(id.as_str()) {
                kept.insert(id.clone(), session.clone());
            } else {
                removed.push(id.as_str());
            }
        }
        for id in &removed {
            summaries.shift_remove(*id);
        }

        self.backend.store_sessions(&kept)?;
        if let Err(e) = self.backend.store_summaries(&summaries) {
            if let Err(restore) = self.backend.store_sessions(&sessions) {
                tracing::error!(error = %restore, "failed to restore sessions after cleanup error");
            }
            return Err(e);
        }

        tracing::info!(removed = removed.len(), kept = kept.len(), "cleaned up old sessions");
        Ok(removed.len())
    }

    /// Counts over both collections, or all zeros if either is unreadable.
    #[must_use]
    pub fn get_storage_stats(&self) -> StorageStats {
        or_degraded("compute storage stats", self.try_stats())
    }

    fn try_stats(&self) -> Result<StorageStats> {
        let sessions = self.backend.load_sessions()?;
        let summaries = self.backend.load_summaries()?;

        Ok(StorageStats {
            total_sessions: sessions.len(),
            active_sessions: sessions.values().filter(|s| s.is_active).count(),
            total_summaries: summaries.len(),
            total_messages: sessions.values().map(|s| s.messages.len()).sum(),
            storage_location: self.backend.location(),
        })
    }

    /// Write `summary` into the summaries collection, returning the entry it
    /// replaced.
    fn upsert_summary(&self, summary: &SessionSummary) -> Result<Option<SessionSummary>> {
        let _guard = lock(&self.summaries_lock);

        let mut summaries = self.backend.load_summaries()?;
        let previous = summaries.insert(summary.session_id.clone(), summary.clone());
        self.backend.store_summaries(&summaries).inspect_err(|e| {
            tracing::error!(session_id = %summary.session_id, error = %e, "failed to save summary");
        })?;

        tracing::info!(session_id = %summary.session_id, "saved summary");
        Ok(previous)
    }

    /// Put the summary entry for `session_id` back to `previous`.
    fn restore_summary(&self, session_id: &str, previous: Option<SessionSummary>) {
        let _guard = lock(&self.summaries_lock);

        let result = self.backend.load_summaries().and_then(|mut summaries| {
            match previous {
                Some(summary) => {
                    summaries.insert(session_id.to_string(), summary);
                }
                None => {
                    summaries.shift_remove(session_id);
                }
            }
            self.backend.store_summaries(&summaries)
        });

        if let Err(e) = result {
            tracing::error!(session_id, error = %e, "failed to roll back summary");
        }
    }
}

/// Take a collection lock, recovering it if a previous holder panicked.
fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Unwrap a read result, logging and substituting an empty value on failure.
fn or_degraded<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not {what}; using empty result");
        T::default()
    })
}

/// Random 8-character hex id.
fn generate_session_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SESSION_ID_LEN);
    id
}

/// Draw ids from `generate` until one is not already stored.
fn pick_session_id(
    existing: &Records<ChatSession>,
    mut generate: impl FnMut() -> String,
) -> Result<String> {
    let mut last = String::new();
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generate();
        if !existing.contains_key(&id) {
            return Ok(id);
        }
        tracing::warn!(session_id = %id, "generated session id already in use");
        last = id;
    }
    Err(Error::IdCollision(last))
}
