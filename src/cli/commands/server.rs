use clap::{Arg, ArgAction, Command};

pub const ARG_PORT: &str = "port";
pub const ARG_SECRETS_FILE: &str = "secrets-file";
pub const ARG_TOKEN_TTL: &str = "token-ttl";
pub const ARG_PASSWORD_HASH: &str = "password-hash";
pub const ARG_SECURE_COOKIES: &str = "secure-cookies";

#[must_use]
pub fn subcommand() -> Command {
    Command::new("server")
        .about("Serve the password gated dashboard")
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORDISTO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SECRETS_FILE)
                .short('s')
                .long("secrets-file")
                .help("KEY=value file holding the token signing secrets")
                .default_value(".env.local")
                .env("PORDISTO_SECRETS_FILE"),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL)
                .long("token-ttl")
                .help("Session token lifetime in seconds")
                .default_value("3600")
                .env("PORDISTO_TOKEN_TTL")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_PASSWORD_HASH)
                .long("password-hash")
                .help("Argon2 hash of the dashboard password, see the hash-password subcommand")
                .env("PORDISTO_PASSWORD_HASH")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_SECURE_COOKIES)
                .long("secure-cookies")
                .help("Mark session cookies Secure, for deployments behind HTTPS")
                .env("PORDISTO_SECURE_COOKIES")
                .action(ArgAction::SetTrue),
        )
}
