//! Deployment configuration for the session client. Values are public; do not
//! store secrets here. The CLI fills this from flags and `FINFLOW_*` variables.

use crate::finflow::errors::ConfigError;
use std::{fmt, str::FromStr};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_STORAGE_KEY: &str = "auth_token";
pub const DEFAULT_REGISTRATION_DISABLED_MESSAGE: &str =
    "Registration is not available in demo mode. Please use test credentials: testuser/testpass";

/// Endpoint used to validate a persisted token at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerifyMode {
    /// `GET /api/auth/profile`
    #[default]
    Profile,
    /// `POST /api/auth/verify`
    Verify,
}

impl VerifyMode {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Profile => "/api/auth/profile",
            Self::Verify => "/api/auth/verify",
        }
    }
}

impl FromStr for VerifyMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "profile" => Ok(Self::Profile),
            "verify" => Ok(Self::Verify),
            other => Err(ConfigError::UnknownVerifyMode(other.to_string())),
        }
    }
}

impl fmt::Display for VerifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile => f.write_str("profile"),
            Self::Verify => f.write_str("verify"),
        }
    }
}

/// Whether this deployment accepts new accounts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Registration {
    #[default]
    Enabled,
    /// Registration fails locally with `message`, without a network call.
    Disabled { message: String },
}

impl Registration {
    #[must_use]
    pub fn disabled() -> Self {
        Self::Disabled {
            message: DEFAULT_REGISTRATION_DISABLED_MESSAGE.to_string(),
        }
    }

    /// Parses `enabled` / `disabled`, attaching `message` (or the default) to
    /// the disabled mode.
    ///
    /// # Errors
    /// Returns an error for any other mode name.
    pub fn parse(mode: &str, message: Option<&str>) -> Result<Self, ConfigError> {
        match mode.trim().to_lowercase().as_str() {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled {
                message: normalize_value(message.unwrap_or_default())
                    .unwrap_or_else(|| DEFAULT_REGISTRATION_DISABLED_MESSAGE.to_string()),
            }),
            other => Err(ConfigError::UnknownRegistrationMode(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub verify_mode: VerifyMode,
    pub registration: Registration,
    pub storage_key: String,
}

impl AppConfig {
    /// # Errors
    /// Returns an error if `api_base_url` is not an absolute http(s) URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            verify_mode: VerifyMode::default(),
            registration: Registration::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        })
    }

    #[must_use]
    pub fn with_verify_mode(mut self, verify_mode: VerifyMode) -> Self {
        self.verify_mode = verify_mode;
        self
    }

    #[must_use]
    pub fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = registration;
        self
    }

    /// Blank keys keep the default.
    #[must_use]
    pub fn with_storage_key(mut self, key: &str) -> Self {
        if let Some(key) = normalize_value(key) {
            self.storage_key = key;
        }
        self
    }

    /// Joins `path` onto the base URL, keeping any base path prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim().trim_start_matches('/'))
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let value = normalize_value(value).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let url = Url::parse(&value)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
