use crate::{
    cli::globals::GlobalArgs,
    finflow::{Rendered, RouteGuard, View},
};
use anyhow::{Result, bail};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub path: String,
}

/// Resolves `path`, lets the guard follow the bootstrap, and prints what the
/// app would render once the session settles.
///
/// # Errors
/// Returns an error for unknown paths or if the session cannot be built.
pub async fn execute(args: Args) -> Result<()> {
    let Some(view) = View::from_path(&args.path) else {
        bail!("Page not found: {}", args.path);
    };

    let session = args.globals.session()?;
    let mut guard = RouteGuard::new(session.subscribe());
    debug!("{view}: {}", guard.render(view));

    let (_, state) = tokio::join!(session.bootstrap(), guard.settled());
    println!("{}", Rendered::for_state(state, view));
    Ok(())
}
