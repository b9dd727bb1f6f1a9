//! Signing-secret providers.
//!
//! Two secrets are live at any time: the `current` one used for minting and
//! the `previous` one kept for a grace window after rotation. Providers
//! must not cache: they re-read their backing configuration on every call,
//! so a rotation performed by another process is observed without a
//! restart.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use thiserror::Error;

pub mod rotation;
mod store;

pub use self::store::{CURRENT_SECRET_KEY, EnvFileStore, PREVIOUS_SECRET_KEY};

#[derive(Debug, Error)]
pub enum Error {
    #[error("no signing secret configured")]
    Unavailable,
}

/// Symmetric signing key material.
///
/// The configured text is the HMAC key as-is; generated secrets are
/// base64url of 32 random bytes, but any non-empty value works so fixed
/// test secrets stay trivial. Debug output is redacted.
#[derive(Clone, Debug)]
pub struct Secret(SecretString);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    pub(crate) fn key_bytes(&self) -> &[u8] {
        self.expose().as_bytes()
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Secret {}

/// Source of the signing secrets consumed by the token codec.
///
/// Implementations must read their backing store on every call; callers
/// rely on observing an external rotation on the very next access.
pub trait SecretSource: Send + Sync {
    /// The `(current, previous)` pair as currently configured.
    fn current_and_previous(&self) -> (Option<Secret>, Option<Secret>);

    /// The secret new tokens are signed with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] when no usable current secret exists.
    /// Minting treats this as fatal; verification never calls this and
    /// degrades to an empty candidate list instead.
    fn current(&self) -> Result<Secret, Error> {
        let (current, _) = self.current_and_previous();
        current
            .filter(|secret| !secret.is_empty())
            .ok_or(Error::Unavailable)
    }

    /// Ordered verification candidates: current first, then previous.
    ///
    /// Empty entries are filtered out and never appear. The current secret
    /// leads because it matches the overwhelming majority of live tokens.
    fn verification_secrets(&self) -> Vec<Secret> {
        let (current, previous) = self.current_and_previous();
        current
            .into_iter()
            .chain(previous)
            .filter(|secret| !secret.is_empty())
            .collect()
    }
}

pub type SharedSecrets = Arc<dyn SecretSource>;
