use crate::finflow::config::{DEFAULT_API_BASE_URL, DEFAULT_STORAGE_KEY};
use clap::{Arg, Command};
use std::path::PathBuf;

/// Deployment settings shared by every subcommand.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the FinFlow API")
                .default_value(DEFAULT_API_BASE_URL)
                .env("FINFLOW_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("verify-mode")
                .long("verify-mode")
                .help("Endpoint used to validate a stored token")
                .long_help(
                    "Endpoint used to validate a stored token at startup: \
                     `profile` (GET /api/auth/profile) or `verify` (POST /api/auth/verify)",
                )
                .default_value("profile")
                .value_parser(["profile", "verify"])
                .env("FINFLOW_VERIFY_MODE")
                .global(true),
        )
        .arg(
            Arg::new("registration")
                .long("registration")
                .help("Whether this deployment accepts new accounts")
                .default_value("enabled")
                .value_parser(["enabled", "disabled"])
                .env("FINFLOW_REGISTRATION")
                .global(true),
        )
        .arg(
            Arg::new("registration-message")
                .long("registration-message")
                .help("Message shown when registration is disabled")
                .env("FINFLOW_REGISTRATION_MESSAGE")
                .global(true),
        )
        .arg(
            Arg::new("token-file")
                .long("token-file")
                .help("File holding the persisted session token")
                .long_help(
                    "File holding the persisted session token \
                     (default: <config dir>/finflow/session.json)",
                )
                .env("FINFLOW_TOKEN_FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("storage-key")
                .long("storage-key")
                .help("Key under which the token is stored")
                .default_value(DEFAULT_STORAGE_KEY)
                .env("FINFLOW_STORAGE_KEY")
                .global(true),
        )
}
