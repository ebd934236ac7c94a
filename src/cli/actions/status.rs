use crate::{
    cli::globals::GlobalArgs,
    finflow::{Session, SessionStatus},
};
use anyhow::Result;
use tracing::info;

fn summary(session: &Session) -> String {
    match (session.status(), session.user()) {
        (SessionStatus::Authenticated, Some(user)) => {
            let mut lines = vec![
                format!("Signed in as {}", user.display_name()),
                format!("username: {}", user.username),
                format!("email:    {}", user.email),
            ];
            if let Some(created_at) = &user.created_at {
                lines.push(format!("since:    {created_at}"));
            }
            lines.join("\n")
        }
        (status, _) => format!("Not signed in ({status})"),
    }
}

/// Verifies the stored token and prints the resulting session.
///
/// # Errors
/// Returns an error if the session cannot be built.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let session = globals.session()?;
    let status = session.bootstrap().await;
    info!("session status: {status}");

    println!("{}", summary(&session.session()));
    Ok(())
}
