use crate::cli::actions::{Action, hash_password, rotate, server};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Server(args) => server::execute(args).await,
        Action::Rotate(args) => rotate::execute(&args),
        Action::HashPassword => hash_password::execute(),
    }
}
