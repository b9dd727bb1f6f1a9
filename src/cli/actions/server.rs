use crate::{
    api,
    auth::{SharedCredentials, SingleCredential},
    secrets::EnvFileStore,
    token::TokenCodec,
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub secrets_file: PathBuf,
    pub token_ttl: i64,
    pub password_hash: String,
    pub secure_cookies: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the password hash is not a valid PHC string or the
/// server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    // A bad hash is a deployment mistake, refuse to start instead of
    // answering every login with 401.
    let credential = SingleCredential::new(&args.password_hash)
        .context("Invalid --password-hash, expected an Argon2 PHC string")?;
    let credentials: SharedCredentials = Arc::new(credential);

    let source = Arc::new(EnvFileStore::new(args.secrets_file));
    let codec = Arc::new(TokenCodec::new(source, args.token_ttl));

    let config = api::SessionConfig::new()
        .with_session_ttl_seconds(args.token_ttl)
        .with_secure_cookies(args.secure_cookies);

    api::new(args.port, codec, credentials, config).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("secrets_file", args.secrets_file.display().to_string()),
        ("token_ttl", format!("{}s", args.token_ttl)),
        ("secure_cookies", args.secure_cookies.to_string()),
        // The hash itself never reaches the logs
        (
            "password_hash_set",
            (!args.password_hash.is_empty()).to_string(),
        ),
    ];
    log_entries("Startup configuration", &entries);
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", pordisto_banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn pordisto_banner() -> String {
    let short_hash = short_commit(crate::GIT_COMMIT_HASH);
    PORDISTO_BANNER.replace(
        "{VERSION}",
        &format!(" - {} - {}", env!("CARGO_PKG_VERSION"), short_hash),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const PORDISTO_BANNER: &str = r"
   ________
  |  ____  |
  | |    | |
  | |   o| |  P O R D I S T O {VERSION}
  | |    | |
  | |____| |
  |________|";
