//! Password verification for the single admin credential.
//!
//! The server never sees a plaintext password at rest: it is handed an
//! Argon2 PHC hash at startup and login candidates are checked against
//! it. Handlers only ever talk to the [`CredentialStore`] capability,
//! so tests can swap in whatever they need.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Capability to check a login candidate. Implementations must not leak
/// which part of the check failed.
pub trait CredentialStore: Send + Sync {
    fn verify_password(&self, candidate: &str) -> bool;
}

pub type SharedCredentials = Arc<dyn CredentialStore>;

/// The one credential this service knows about: a single Argon2 hash,
/// usually produced by the `hash-password` subcommand.
pub struct SingleCredential {
    password_hash: SecretString,
}

impl SingleCredential {
    /// Build the store, rejecting hashes that are not valid PHC strings
    /// so a misconfigured deployment fails at startup instead of turning
    /// every login into a silent 401.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHash`] when the hash does not parse.
    pub fn new(password_hash: &str) -> Result<Self, Error> {
        PasswordHash::new(password_hash).map_err(|err| Error::InvalidHash(err.to_string()))?;
        Ok(Self {
            password_hash: SecretString::from(password_hash.to_string()),
        })
    }
}

impl CredentialStore for SingleCredential {
    fn verify_password(&self, candidate: &str) -> bool {
        match PasswordHash::new(self.password_hash.expose_secret()) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Hash a plaintext password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns [`Error::Hash`] when hashing fails.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| Error::Hash(err.to_string()))?;
    Ok(hash.to_string())
}
