use crate::cli::{
    actions::{Action, rotate, server},
    commands,
};
use anyhow::{Context, Result};

/// Map parsed CLI matches to an action.
///
/// # Errors
///
/// Returns an error if the subcommand or its arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    // Closure to return subcommand matches
    let sub_m = |subcommand| -> Result<&clap::ArgMatches> {
        matches
            .subcommand_matches(subcommand)
            .context("arguments not found")
    };

    match matches.subcommand_name() {
        Some("server") => {
            let sub_m = sub_m("server")?;

            Ok(Action::Server(server::Args {
                port: sub_m
                    .get_one::<u16>(commands::server::ARG_PORT)
                    .copied()
                    .unwrap_or(8080),
                secrets_file: sub_m
                    .get_one::<String>(commands::server::ARG_SECRETS_FILE)
                    .map(Into::into)
                    .context("missing required argument: --secrets-file")?,
                token_ttl: sub_m
                    .get_one::<i64>(commands::server::ARG_TOKEN_TTL)
                    .copied()
                    .unwrap_or(3600),
                password_hash: sub_m
                    .get_one::<String>(commands::server::ARG_PASSWORD_HASH)
                    .cloned()
                    .context("missing required argument: --password-hash")?,
                secure_cookies: sub_m.get_flag(commands::server::ARG_SECURE_COOKIES),
            }))
        }
        Some("rotate") => {
            let sub_m = sub_m("rotate")?;

            Ok(Action::Rotate(rotate::Args {
                secrets_file: sub_m
                    .get_one::<String>(commands::rotate::ARG_SECRETS_FILE)
                    .map(Into::into)
                    .context("missing required argument: --secrets-file")?,
            }))
        }
        Some("hash-password") => Ok(Action::HashPassword),
        _ => Err(anyhow::anyhow!("no subcommand provided")),
    }
}
