//! `memchat list`, `active` and `summaries` command implementations.

use crate::core::{SessionStore, SessionSummary};
use crate::error::Result;
use chrono::{DateTime, Local, Utc};
use std::collections::HashSet;

/// Default number of summaries to show.
const DEFAULT_LIMIT: usize = 20;

/// Maximum length for summary preview.
const SUMMARY_PREVIEW_LEN: usize = 60;

/// Run the list command.
///
/// Shows every stored session id in first-save order, marking open ones.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn run(store: &SessionStore) -> Result<()> {
    let history = store.get_session_history();

    if history.is_empty() {
        println!("No sessions found.");
        println!("\nSessions are stored in: {}", store.backend().location());
        return Ok(());
    }

    let active: HashSet<String> = store
        .get_active_sessions()
        .into_iter()
        .map(|s| s.session_id)
        .collect();

    println!("{:<10} Status", "Session");
    println!("{}", "─".repeat(20));
    for session_id in &history {
        let status = if active.contains(session_id) {
            "active"
        } else {
            "closed"
        };
        println!("{session_id:<10} {status}");
    }
    println!("{}", "─".repeat(20));
    println!("Showing {} session(s)", history.len());

    Ok(())
}

/// Run the active command.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn run_active(store: &SessionStore) -> Result<()> {
    let sessions = store.get_active_sessions();

    if sessions.is_empty() {
        println!("No active sessions.");
        return Ok(());
    }

    println!("{:<10} {:<17} {:>8} Memory", "Session", "Started", "Messages");
    println!("{}", "─".repeat(50));
    for session in &sessions {
        println!(
            "{:<10} {:<17} {:>8} {}",
            session.session_id,
            format_local_time(session.start_time),
            session.messages.len(),
            if session.memory_enabled { "on" } else { "off" }
        );
    }

    Ok(())
}

/// Run the summaries command.
///
/// Shows the most recent summaries first.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn run_summaries(store: &SessionStore, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let summaries: Vec<SessionSummary> =
        store.get_session_summaries().into_iter().take(limit).collect();

    if summaries.is_empty() {
        println!("No summaries found.");
        return Ok(());
    }

    println!("{:<10} {:<17} {:>8} Summary", "Session", "Ended", "Messages");
    println!("{}", "─".repeat(100));
    for summary in &summaries {
        println!(
            "{:<10} {:<17} {:>8} {}",
            summary.session_id,
            format_local_time(summary.end_time),
            summary.message_count,
            format_summary_preview(&summary.summary)
        );
    }
    println!("{}", "─".repeat(100));
    println!("Showing {} summary(ies)", summaries.len());

    Ok(())
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

/// First line of the summary, truncated on a character boundary.
fn format_summary_preview(summary: &str) -> String {
    let first_line = summary.lines().next().unwrap_or_default();
    if first_line.chars().count() > SUMMARY_PREVIEW_LEN {
        let cut: String = first_line.chars().take(SUMMARY_PREVIEW_LEN).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}
