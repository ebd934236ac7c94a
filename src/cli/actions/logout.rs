use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// Local only: the backend keeps no session to revoke.
///
/// # Errors
/// Returns an error if the session cannot be built.
pub fn execute(globals: &GlobalArgs) -> Result<()> {
    globals.session()?.logout();
    println!("Signed out");
    Ok(())
}
