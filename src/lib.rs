//! # Tasko (Task Tracking API)
//!
//! `tasko` is a task-tracking backend: a REST API with per-user task
//! ownership and bearer-token session handling.
//!
//! ## Ownership Model
//!
//! Every task carries the id of the user that created it. The owner is always
//! taken from the authenticated caller, never from the request body, and it is
//! immutable for the lifetime of the task. All task reads and writes are gated
//! on "does this task belong to the caller".
//!
//! - **Two-step authorization:** handlers load a task by id first and compare
//!   the owner second, so a missing task (`404`) stays distinguishable from
//!   someone else's task (`401`).
//! - **Write-time validation:** title and description length bounds are
//!   enforced on create and update; violating values are rejected, never
//!   truncated.
//!
//! ## Authentication (bearer tokens)
//!
//! Registration and login issue a signed `HS256` token embedding the user id
//! and an expiry. Protected routes expect it in the `Authorization: Bearer`
//! header; the guard verifies signature and expiry, then resolves the user
//! against the database before any handler logic runs.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
