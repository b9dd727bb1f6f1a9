use crate::secrets::rotation;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub secrets_file: PathBuf,
}

/// Execute the rotate action.
/// # Errors
/// Returns an error if the secrets file cannot be replaced.
pub fn execute(args: &Args) -> Result<()> {
    let outcome = rotation::rotate_file(&args.secrets_file)?;

    // Log the shape of the rotation, never the secret values
    if outcome.previous_retained {
        info!(
            "Rotated {}: fresh secret installed, old one kept for verification",
            args.secrets_file.display()
        );
    } else {
        info!(
            "Bootstrapped {}: first secret installed, nothing to demote",
            args.secrets_file.display()
        );
    }

    Ok(())
}
