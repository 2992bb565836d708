//! `memchat stats` command implementation.

use crate::core::{SessionStore, StorageStats};
use crate::error::Result;

/// Run the stats command.
///
/// # Errors
///
/// Returns an error only if `json` output cannot be serialized.
pub fn run(store: &SessionStore, json: bool) -> Result<()> {
    let stats = store.get_storage_stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_stats(&stats));
    }

    Ok(())
}

/// Render stats as an aligned table.
fn render_stats(stats: &StorageStats) -> String {
    let location = if stats.storage_location.is_empty() {
        "(unavailable)"
    } else {
        stats.storage_location.as_str()
    };

    format!(
        "Storage: {location}\n{rule}\n{:<18} {:>8}\n{:<18} {:>8}\n{:<18} {:>8}\n{:<18} {:>8}\n",
        "Sessions",
        stats.total_sessions,
        "Active sessions",
        stats.active_sessions,
        "Summaries",
        stats.total_summaries,
        "Messages",
        stats.total_messages,
        rule = "─".repeat(27),
    )
}
