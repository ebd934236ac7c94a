use crate::finflow::{AppConfig, AuthClient, FileStore, Registration, SessionManager, VerifyMode};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};

/// Settings shared by every action: where the API lives and where the session
/// token is kept.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
    pub token_file: PathBuf,
}

impl GlobalArgs {
    /// # Errors
    /// Returns an error for an invalid API URL or mode, or when no token file
    /// is given and the platform has no config directory.
    pub fn new(
        api_url: &str,
        verify_mode: &str,
        registration: &str,
        registration_message: Option<&str>,
        storage_key: &str,
        token_file: Option<PathBuf>,
    ) -> Result<Self> {
        let verify_mode = verify_mode
            .parse::<VerifyMode>()
            .context("invalid FINFLOW_VERIFY_MODE")?;
        let registration = Registration::parse(registration, registration_message)
            .context("invalid FINFLOW_REGISTRATION")?;

        let config = AppConfig::new(api_url)
            .context("invalid FINFLOW_API_URL")?
            .with_verify_mode(verify_mode)
            .with_registration(registration)
            .with_storage_key(storage_key);

        let token_file = match token_file {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => FileStore::default_path()
                .context("no config directory found, set --token-file or FINFLOW_TOKEN_FILE")?,
        };

        Ok(Self { config, token_file })
    }

    /// Builds a session manager backed by the token file. The session starts
    /// in `Initializing`; callers bootstrap it when they need a verdict.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn session(&self) -> Result<SessionManager> {
        let client = AuthClient::new(self.config.clone()).context("failed to build HTTP client")?;
        let store = Arc::new(FileStore::new(&self.token_file));
        Ok(SessionManager::new(client, store))
    }
}
