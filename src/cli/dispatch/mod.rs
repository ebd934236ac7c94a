use crate::cli::{
    actions::{Action, login, open, password, register},
    globals::GlobalArgs,
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn optional(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn secret(matches: &ArgMatches, name: &str) -> Result<SecretString> {
    required(matches, name).map(SecretString::from)
}

/// Confirmation defaults to the password itself when not given.
fn confirmation(matches: &ArgMatches, password: &SecretString) -> SecretString {
    optional(matches, "confirm-password").map_or_else(|| password.clone(), SecretString::from)
}

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    GlobalArgs::new(
        &required(matches, "api-url")?,
        &required(matches, "verify-mode")?,
        &required(matches, "registration")?,
        matches
            .get_one::<String>("registration-message")
            .map(String::as_str),
        &required(matches, "storage-key")?,
        matches.get_one::<PathBuf>("token-file").cloned(),
    )
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let Some((name, sub)) = matches.subcommand() else {
        return Err(anyhow!("missing subcommand"));
    };

    if name == "views" {
        return Ok(Action::Views);
    }

    let globals = globals(matches)?;

    let action = match name {
        "status" => Action::Status(globals),
        "logout" => Action::Logout(globals),
        "login" => Action::Login(login::Args {
            globals,
            username: required(sub, "username")?,
            password: secret(sub, "password")?,
        }),
        "register" => {
            let password = secret(sub, "password")?;
            Action::Register(register::Args {
                globals,
                username: required(sub, "username")?,
                email: required(sub, "email")?,
                confirm_password: confirmation(sub, &password),
                password,
                first_name: optional(sub, "first-name"),
                last_name: optional(sub, "last-name"),
            })
        }
        "forgot-password" => Action::ForgotPassword(password::ForgotArgs {
            globals,
            email: required(sub, "email")?,
        }),
        "reset-password" => {
            let new_password = secret(sub, "new-password")?;
            Action::ResetPassword(password::ResetArgs {
                globals,
                reset_token: secret(sub, "token")?,
                confirm_password: confirmation(sub, &new_password),
                new_password,
            })
        }
        "change-password" => {
            let new_password = secret(sub, "new-password")?;
            Action::ChangePassword(password::ChangeArgs {
                globals,
                current_password: secret(sub, "current-password")?,
                confirm_password: confirmation(sub, &new_password),
                new_password,
            })
        }
        "open" => Action::Open(open::Args {
            globals,
            path: optional(sub, "path").unwrap_or_else(|| "/".to_string()),
        }),
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(action)
}
