use crate::{cli::globals::GlobalArgs, finflow::forms::RegisterForm};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// # Errors
/// Returns the validation message, the disabled-registration message, or the
/// backend message when registration fails.
pub async fn execute(args: Args) -> Result<()> {
    let request = RegisterForm {
        username: args.username,
        email: args.email,
        password: args.password.expose_secret().to_string(),
        confirm_password: args.confirm_password.expose_secret().to_string(),
        first_name: args.first_name,
        last_name: args.last_name,
    }
    .validate()?;

    let session = args.globals.session()?;
    session.bootstrap().await;

    let user = session.register(&request).await?;
    println!("Account created, signed in as {}", user.display_name());
    Ok(())
}
