//! Stamps the git revision into `memchat --version`.

use std::env;
use std::process::Command;

/// Stdout of a successful git invocation, trimmed.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    for path in [".git/HEAD", ".git/index", ".git/refs/tags/"] {
        println!("cargo:rerun-if-changed={path}");
    }
    println!("cargo:rerun-if-env-changed=MEMCHAT_GIT_HASH");

    // Source tarballs have no .git; packagers can pass the revision in
    let revision = env::var("MEMCHAT_GIT_HASH")
        .ok()
        .or_else(|| git(&["rev-parse", "--short=8", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());

    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());

    // Only a clean checkout of a v* tag counts as a release
    let tagged = git(&["describe", "--exact-match", "--tags", "--match", "v*", "HEAD"]).is_some();
    let is_release = tagged && !dirty;

    let suffix = if dirty { "-dirty" } else { "" };
    println!("cargo:rustc-env=MEMCHAT_GIT_HASH={revision}{suffix}");
    println!("cargo:rustc-env=MEMCHAT_IS_RELEASE={is_release}");
}
