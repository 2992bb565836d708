//! Running external model programs over stdin/stdout.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Run `program` with `input` on stdin and return its trimmed stdout.
///
/// The error is a human-readable reason; callers wrap it in their own
/// error variant. A non-zero exit or empty output counts as failure.
pub(crate) fn pipe_through(
    program: &str,
    args: &[String],
    input: String,
) -> std::result::Result<String, String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("failed to run {program}: {e}"))?;

    // Feed stdin from a separate thread so a chatty child can't deadlock us
    let writer = child.stdin.take().map(|mut stdin| {
        thread::spawn(move || {
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                tracing::debug!(error = %e, "child stopped reading stdin");
            }
        })
    });

    let output = child
        .wait_with_output()
        .map_err(|e| format!("{program} did not finish: {e}"))?;
    if let Some(writer) = writer {
        let _ = writer.join();
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        ));
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        return Err(format!("{program} produced no output"));
    }
    Ok(text)
}
