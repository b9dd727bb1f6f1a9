use clap::{Arg, Command};

pub const ARG_SECRETS_FILE: &str = "secrets-file";

#[must_use]
pub fn subcommand() -> Command {
    Command::new("rotate")
        .about("Generate a fresh signing secret, demoting the current one")
        .arg(
            Arg::new(ARG_SECRETS_FILE)
                .short('s')
                .long("secrets-file")
                .help("KEY=value file holding the token signing secrets")
                .default_value(".env.local")
                .env("PORDISTO_SECRETS_FILE"),
        )
}
