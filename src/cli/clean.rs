//! `memchat clean` command implementation.

use crate::core::SessionStore;
use crate::error::Result;

/// Run the clean command.
///
/// Keeps the `keep_count` most recently started sessions and removes the
/// rest along with their summaries.
///
/// # Errors
///
/// Never fails; cleanup problems are logged and leave storage unchanged.
pub fn run(store: &SessionStore, keep_count: usize) -> Result<()> {
    let removed = store.cleanup_old_sessions(keep_count);

    if removed == 0 {
        println!("No sessions to clean.");
    } else {
        println!("Cleaned {removed} session(s), kept the newest {keep_count}.");
    }

    Ok(())
}
