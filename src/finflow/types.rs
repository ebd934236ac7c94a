//! Identity, session, and wire payload types for the auth API. Request payloads
//! carry passwords and reset tokens, so none of them may be logged.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identity as returned by the backend. The verify endpoint and the
/// login response omit some fields, hence the optional `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    /// First and last name when known, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Initializing => "initializing",
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}

/// Current identity and bearer token.
///
/// `status` is `Authenticated` exactly when both `user` and `token` are
/// present; the constructors are the only way to build one.
#[derive(Clone)]
pub struct Session {
    user: Option<User>,
    token: Option<SecretString>,
    status: SessionStatus,
}

impl Session {
    #[must_use]
    pub const fn initializing() -> Self {
        Self {
            user: None,
            token: None,
            status: SessionStatus::Initializing,
        }
    }

    #[must_use]
    pub const fn unauthenticated() -> Self {
        Self {
            user: None,
            token: None,
            status: SessionStatus::Unauthenticated,
        }
    }

    #[must_use]
    pub fn authenticated(user: User, token: SecretString) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            status: SessionStatus::Authenticated,
        }
    }

    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initializing()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("status", &self.status)
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Serialize)]
pub struct ResetPasswordRequest {
    #[serde(rename = "token")]
    pub reset_token: String,
    pub new_password: String,
}

#[derive(Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Login and registration success payload. Older deployments name the token
/// `token` instead of `access_token`.
#[derive(Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    pub user: User,
}

/// Verify/profile success payload.
#[derive(Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Error payload. Only a string `error` counts as a backend message.
#[derive(Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}
