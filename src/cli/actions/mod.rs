pub mod login;
pub mod logout;
pub mod open;
pub mod password;
pub mod register;
pub mod status;
pub mod views;

// Internal "interpreter" for `Action`; the match lives in `run` so this module
// stays a plain list of commands.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Status(GlobalArgs),
    Login(login::Args),
    Register(register::Args),
    Logout(GlobalArgs),
    ForgotPassword(password::ForgotArgs),
    ResetPassword(password::ResetArgs),
    ChangePassword(password::ChangeArgs),
    Open(open::Args),
    Views,
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
