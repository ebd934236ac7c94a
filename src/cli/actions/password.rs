use crate::{
    cli::globals::GlobalArgs,
    finflow::forms::{ChangePasswordForm, ForgotPasswordForm, ResetPasswordForm},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct ForgotArgs {
    pub globals: GlobalArgs,
    pub email: String,
}

#[derive(Debug)]
pub struct ResetArgs {
    pub globals: GlobalArgs,
    pub reset_token: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

#[derive(Debug)]
pub struct ChangeArgs {
    pub globals: GlobalArgs,
    pub current_password: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

/// # Errors
/// Returns the validation message or `Failed to send reset email`.
pub async fn forgot(args: ForgotArgs) -> Result<()> {
    let request = ForgotPasswordForm { email: args.email }.validate()?;

    let session = args.globals.session()?;
    session.bootstrap().await;
    session.forgot_password(&request).await?;

    println!("If {} belongs to an account, a reset link is on its way", request.email);
    Ok(())
}

/// # Errors
/// Returns the validation message or `Password reset failed`.
pub async fn reset(args: ResetArgs) -> Result<()> {
    let request = ResetPasswordForm {
        reset_token: args.reset_token.expose_secret().to_string(),
        new_password: args.new_password.expose_secret().to_string(),
        confirm_password: args.confirm_password.expose_secret().to_string(),
    }
    .validate()?;

    let session = args.globals.session()?;
    session.bootstrap().await;
    session.reset_password(&request).await?;

    println!("Password reset, sign in with the new password");
    Ok(())
}

/// Validation runs before the session is touched, so a mismatched
/// confirmation never reaches the network.
///
/// # Errors
/// Returns the validation message, `Not signed in`, or the backend message.
pub async fn change(args: ChangeArgs) -> Result<()> {
    let request = ChangePasswordForm {
        current_password: args.current_password.expose_secret().to_string(),
        new_password: args.new_password.expose_secret().to_string(),
        confirm_password: args.confirm_password.expose_secret().to_string(),
    }
    .validate()?;

    let session = args.globals.session()?;
    session.bootstrap().await;
    session.change_password(&request).await?;

    println!("Password changed");
    Ok(())
}
