//! In-memory storage backend for testing.

use crate::core::{ChatSession, SessionSummary};
use crate::error::{Error, Result};
use crate::storage::traits::{CollectionStore, Records};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

/// In-memory storage backend for testing.
///
/// Reads and writes can be made to fail on demand so callers can exercise
/// their degraded and error paths.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sessions: RwLock<Records<ChatSession>>,
    summaries: RwLock<Records<SessionSummary>>,
    fail_reads: AtomicBool,
    fail_session_writes: AtomicBool,
    fail_summary_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create a new in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent load fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent sessions write fail (or succeed again).
    pub fn set_fail_session_writes(&self, fail: bool) {
        self.fail_session_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent summaries write fail (or succeed again).
    pub fn set_fail_summary_writes(&self, fail: bool) {
        self.fail_summary_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Storage(io::Error::other(format!(
                "simulated {what} failure"
            ))));
        }
        Ok(())
    }
}

impl CollectionStore for MemoryBackend {
    fn load_sessions(&self) -> Result<Records<ChatSession>> {
        Self::check(&self.fail_reads, "read")?;
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(sessions.clone())
    }

    fn store_sessions(&self, sessions: &Records<ChatSession>) -> Result<()> {
        Self::check(&self.fail_session_writes, "sessions write")?;
        let mut stored = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        stored.clone_from(sessions);
        Ok(())
    }

    fn load_summaries(&self) -> Result<Records<SessionSummary>> {
        Self::check(&self.fail_reads, "read")?;
        let summaries = self.summaries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(summaries.clone())
    }

    fn store_summaries(&self, summaries: &Records<SessionSummary>) -> Result<()> {
        Self::check(&self.fail_summary_writes, "summaries write")?;
        let mut stored = self.summaries.write().unwrap_or_else(PoisonError::into_inner);
        stored.clone_from(summaries);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
