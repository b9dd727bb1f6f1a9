//! # Pordisto (Password Gated Dashboard)
//!
//! `pordisto` is a small HTTP service guarding a single-tenant dashboard
//! behind one shared password. A successful login mints a short-lived
//! HMAC-SHA256 session token stored in an `HttpOnly` cookie; a middleware
//! gate fully verifies that token before any protected route is served.
//!
//! ## Secret rotation
//!
//! Tokens are signed with the **current** secret read from a key/value file
//! (`JWT_SECRET=`, with `JWT_SECRET_OLD=` holding the previous generation).
//! The file is re-read on every access, so the out-of-band `rotate`
//! subcommand can atomically swap in a fresh secret without a restart.
//! Verification tries the current secret first and falls back to the
//! previous one, keeping sessions signed before a rotation alive until they
//! expire naturally. At most two secrets are ever accepted, so anything
//! signed two rotations back stops verifying. Rotate less often than the
//! token lifetime unless cutting sessions short is the intent.
//!
//! ## Subcommands
//!
//! - `server`: serve the dashboard API.
//! - `rotate`: replace the signing secret, demoting the old one.
//! - `hash-password`: produce the Argon2 hash the server is configured with.

pub mod api;
pub mod auth;
pub mod cli;
pub mod secrets;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
