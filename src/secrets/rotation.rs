//! Out-of-band replacement of the signing secret.
//!
//! Rotation demotes the current secret to [`PREVIOUS_SECRET_KEY`] and
//! installs a freshly generated value under [`CURRENT_SECRET_KEY`]. The
//! file is replaced atomically (write a temp file in the same directory,
//! fsync, rename) so a concurrent reader sees either the old pair or the
//! new pair, never a half-written mix.

use super::store::{is_key_line, lookup_key};
use super::{CURRENT_SECRET_KEY, PREVIOUS_SECRET_KEY};
use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use std::{fs, io::ErrorKind, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::warn;

const SECRET_BYTES: usize = 32;

/// What a completed rotation did, for operator-facing logging.
#[derive(Debug)]
pub struct RotationOutcome {
    /// False on the bootstrap run, when there was no secret to demote.
    pub previous_retained: bool,
}

/// Generate a fresh signing secret: 32 random bytes, base64url unpadded.
///
/// # Errors
///
/// Returns an error when the OS RNG fails to produce entropy.
pub fn generate_secret() -> Result<String> {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("Failed to gather entropy for the new signing secret")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Rotate the signing secret stored in `path`.
///
/// Unrelated lines are preserved verbatim; the two secret keys are
/// replaced in place when present and appended otherwise. A missing file
/// is treated as empty so the first rotation bootstraps it.
///
/// # Errors
///
/// Returns an error when the file cannot be read (other than not
/// existing), entropy is unavailable, or the atomic replace fails.
pub fn rotate_file(path: &Path) -> Result<RotationOutcome> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("{} not found, bootstrapping a new secrets file", path.display());
            String::new()
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let old_current = lookup_key(&content, CURRENT_SECRET_KEY);
    let new_secret = generate_secret()?;

    let mut next = upsert_key(&content, CURRENT_SECRET_KEY, &new_secret);
    if let Some(previous) = &old_current {
        next = upsert_key(&next, PREVIOUS_SECRET_KEY, previous);
    }

    replace_file_atomic(path, &next)?;

    Ok(RotationOutcome {
        previous_retained: old_current.is_some(),
    })
}

/// Replace the first `key=` line with `key=value`, appending when absent.
/// Every other line is carried over untouched.
fn upsert_key(content: &str, key: &str, value: &str) -> String {
    let mut lines: Vec<String> = content.lines().map(ToString::to_string).collect();
    let mut replaced = false;
    for line in &mut lines {
        if is_key_line(line, key) {
            *line = format!("{key}={value}");
            replaced = true;
            break;
        }
    }
    if !replaced {
        lines.push(format!("{key}={value}"));
    }
    let mut next = lines.join("\n");
    next.push('\n');
    next
}

fn replace_file_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create a temporary file in {}", parent.display()))?;

    // Secrets file: owner-only before any secret byte lands on disk.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .context("Failed to restrict permissions on the replacement file")?;
    }

    temp.write_all(content.as_bytes())
        .context("Failed to write the replacement file")?;
    temp.as_file()
        .sync_all()
        .context("Failed to flush the replacement file")?;
    temp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{EnvFileStore, Secret, SecretSource};
    use tempfile::TempDir;

    const NO_ENV: [(&str, Option<&str>); 2] = [
        (CURRENT_SECRET_KEY, None),
        (PREVIOUS_SECRET_KEY, None),
    ];

    #[test]
    fn generated_secrets_are_base64url_of_32_bytes() {
        let secret = generate_secret().expect("generate");
        // 32 bytes -> 43 unpadded base64url characters.
        assert_eq!(secret.len(), 43);
        assert!(secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(secret, generate_secret().expect("generate"));
    }

    #[test]
    fn bootstrap_creates_file_with_only_current_key() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".env.local");

        let outcome = rotate_file(&path).expect("rotate");
        assert!(!outcome.previous_retained);

        let content = fs::read_to_string(&path).expect("read back");
        assert!(lookup_key(&content, CURRENT_SECRET_KEY).is_some());
        assert!(lookup_key(&content, PREVIOUS_SECRET_KEY).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn rotated_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".env.local");
        rotate_file(&path).expect("rotate");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn rotation_demotes_current_to_previous() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".env.local");
        fs::write(&path, "JWT_SECRET=AAA\n").expect("seed");

        let outcome = rotate_file(&path).expect("rotate");
        assert!(outcome.previous_retained);

        let content = fs::read_to_string(&path).expect("read back");
        let current = lookup_key(&content, CURRENT_SECRET_KEY).expect("current");
        assert_eq!(
            lookup_key(&content, PREVIOUS_SECRET_KEY).as_deref(),
            Some("AAA")
        );
        assert_ne!(current, "AAA");
    }

    #[test]
    fn two_rotations_keep_only_one_generation_back() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".env.local");
        fs::write(&path, "JWT_SECRET=AAA\n").expect("seed");

        rotate_file(&path).expect("first rotation");
        let after_first = fs::read_to_string(&path).expect("read");
        let second_current = lookup_key(&after_first, CURRENT_SECRET_KEY).expect("current");

        rotate_file(&path).expect("second rotation");
        let after_second = fs::read_to_string(&path).expect("read");
        assert_eq!(
            lookup_key(&after_second, PREVIOUS_SECRET_KEY),
            Some(second_current)
        );
        // The very first secret is gone entirely.
        assert!(!after_second.contains("AAA"));
    }

    #[test]
    fn rotation_preserves_unrelated_lines_and_order() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".env.local");
        fs::write(
            &path,
            "# local config\nDATABASE_URL=postgres://localhost/app\nJWT_SECRET=AAA\nFEATURE_FLAG=on\n",
        )
        .expect("seed");

        rotate_file(&path).expect("rotate");

        let content = fs::read_to_string(&path).expect("read back");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "# local config");
        assert_eq!(lines[1], "DATABASE_URL=postgres://localhost/app");
        assert!(lines[2].starts_with("JWT_SECRET="));
        assert_eq!(lines[3], "FEATURE_FLAG=on");
        assert_eq!(
            lookup_key(&content, PREVIOUS_SECRET_KEY).as_deref(),
            Some("AAA")
        );
    }

    #[test]
    fn rotation_never_duplicates_key_lines() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(".env.local");
        fs::write(&path, "JWT_SECRET=BBB\nJWT_SECRET_OLD=AAA\n").expect("seed");

        rotate_file(&path).expect("rotate");

        let content = fs::read_to_string(&path).expect("read back");
        let current_lines = content
            .lines()
            .filter(|line| is_key_line(line, CURRENT_SECRET_KEY))
            .count();
        let previous_lines = content
            .lines()
            .filter(|line| is_key_line(line, PREVIOUS_SECRET_KEY))
            .count();
        assert_eq!((current_lines, previous_lines), (1, 1));
        assert_eq!(
            lookup_key(&content, PREVIOUS_SECRET_KEY).as_deref(),
            Some("BBB")
        );
    }

    #[test]
    fn store_picks_up_rotation_on_next_read() {
        temp_env::with_vars(NO_ENV, || {
            let dir = TempDir::new().expect("tempdir");
            let path = dir.path().join(".env.local");
            fs::write(&path, "JWT_SECRET=AAA\n").expect("seed");

            let store = EnvFileStore::new(&path);
            assert_eq!(store.verification_secrets(), vec![Secret::new("AAA")]);

            rotate_file(&path).expect("rotate");

            let candidates = store.verification_secrets();
            assert_eq!(candidates.len(), 2);
            assert_eq!(candidates[1], Secret::new("AAA"));
            assert_ne!(candidates[0], Secret::new("AAA"));
        });
    }
}
