use crate::auth;
use anyhow::{Context, Result, ensure};
use std::io::{BufRead, Write};

/// Execute the hash-password action: read one line from stdin and print
/// the Argon2 PHC string for it on stdout.
/// # Errors
/// Returns an error if stdin cannot be read, the password is empty, or
/// hashing fails.
pub fn execute() -> Result<()> {
    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;

    let password = password.trim_end_matches(['\r', '\n']);
    ensure!(!password.is_empty(), "Refusing to hash an empty password");

    let hash = auth::hash_password(password)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{hash}").context("Failed to write hash to stdout")?;

    Ok(())
}
