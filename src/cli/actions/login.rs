use crate::{cli::globals::GlobalArgs, finflow::forms::LoginForm};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub username: String,
    pub password: SecretString,
}

/// # Errors
/// Returns the validation or backend message when sign-in fails.
pub async fn execute(args: Args) -> Result<()> {
    let request = LoginForm {
        username: args.username,
        password: args.password.expose_secret().to_string(),
    }
    .validate()?;

    let session = args.globals.session()?;
    session.bootstrap().await;

    let user = session.login(&request).await?;
    println!("Signed in as {}", user.display_name());
    Ok(())
}
