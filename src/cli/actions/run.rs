use crate::cli::actions::{Action, login, logout, open, password, register, status, views};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Status(globals) => status::execute(&globals).await,
        Action::Login(args) => login::execute(args).await,
        Action::Register(args) => register::execute(args).await,
        Action::Logout(globals) => logout::execute(&globals),
        Action::ForgotPassword(args) => password::forgot(args).await,
        Action::ResetPassword(args) => password::reset(args).await,
        Action::ChangePassword(args) => password::change(args).await,
        Action::Open(args) => open::execute(args).await,
        Action::Views => {
            views::execute();
            Ok(())
        }
    }
}
