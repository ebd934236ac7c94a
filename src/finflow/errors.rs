use thiserror::Error;

/// Backend exchange an error came from. Each one carries the message surfaced
/// when the backend gives no usable reason of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Verify,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    ChangePassword,
}

impl Operation {
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Verify => "Token verification failed",
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::ForgotPassword => "Failed to send reset email",
            Self::ResetPassword => "Password reset failed",
            Self::ChangePassword => "Password change failed",
        }
    }

    /// Span-friendly name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Login => "login",
            Self::Register => "register",
            Self::ForgotPassword => "forgot_password",
            Self::ResetPassword => "reset_password",
            Self::ChangePassword => "change_password",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend answered non-OK with an `error` message; shown verbatim.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// No response was received.
    #[error("{}", .operation.fallback_message())]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
    /// The response body could not be used.
    #[error("{}", .operation.fallback_message())]
    Malformed { operation: Operation, detail: String },
    #[error("{0}")]
    RegistrationDisabled(String),
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Session is still initializing")]
    NotReady,
    #[error("{0}")]
    Validation(String),
    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// HTTP status of a backend rejection, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid store contents: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("API base URL must use http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("unknown verify mode: {0} (expected profile or verify)")]
    UnknownVerifyMode(String),
    #[error("unknown registration mode: {0} (expected enabled or disabled)")]
    UnknownRegistrationMode(String),
}
