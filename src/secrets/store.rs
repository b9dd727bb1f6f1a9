//! File-backed secret store with environment fallback.

use super::{Secret, SecretSource};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Key holding the active signing secret.
pub const CURRENT_SECRET_KEY: &str = "JWT_SECRET";
/// Key holding the secret demoted by the last rotation.
pub const PREVIOUS_SECRET_KEY: &str = "JWT_SECRET_OLD";

/// Reads secrets from a `KEY=value` file, falling back to same-named
/// environment variables when the file is missing, unreadable, or lacks
/// the key.
///
/// Every lookup re-reads the file. That is deliberate: the `rotate`
/// subcommand swaps the file out from under a running server, and the next
/// mint/verify call must pick up the new pair without a restart.
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_key(&self, key: &str) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| lookup_key(&content, key))
            .or_else(|| env::var(key).ok().filter(|value| !value.is_empty()))
    }
}

impl SecretSource for EnvFileStore {
    fn current_and_previous(&self) -> (Option<Secret>, Option<Secret>) {
        (
            self.read_key(CURRENT_SECRET_KEY).map(Secret::new),
            self.read_key(PREVIOUS_SECRET_KEY).map(Secret::new),
        )
    }
}

/// Find the value bound to `key` in `KEY=value` content.
///
/// The key must start the line exactly (no leading whitespace, so comments
/// and indented lines never match), the first matching line wins, and the
/// value runs to the end of the line. Empty values count as absent.
pub(crate) fn lookup_key(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.strip_prefix(key)?.strip_prefix('=')?;
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Whether `line` assigns `key`, regardless of the value.
pub(crate) fn is_key_line(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('='))
        .is_some()
}
