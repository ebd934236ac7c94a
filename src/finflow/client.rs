//! Client wrappers for the FinFlow auth endpoints. Each method is a single
//! request/response exchange; none of them retries or touches session state.

use crate::finflow::{
    api::{self, Call},
    config::{AppConfig, VerifyMode},
    errors::{AuthError, Operation},
    types::{
        AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
        RegisterRequest, ResetPasswordRequest, User, UserEnvelope,
    },
};
use reqwest::{Client, Method};
use secrecy::SecretString;
use tracing::instrument;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";
pub const CHANGE_PASSWORD_PATH: &str = "/api/auth/change-password";

#[derive(Clone, Debug)]
pub struct AuthClient {
    http: Client,
    config: AppConfig,
}

impl AuthClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> reqwest::Result<Self> {
        Ok(Self {
            http: api::client()?,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Fetches the identity behind `token` from the configured verify endpoint.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-OK status, or a body
    /// without a `user`.
    #[instrument(skip_all, fields(mode = %self.config.verify_mode))]
    pub async fn verify(&self, token: &SecretString) -> Result<User, AuthError> {
        let method = match self.config.verify_mode {
            VerifyMode::Profile => Method::GET,
            VerifyMode::Verify => Method::POST,
        };

        let envelope: UserEnvelope = Call::<()> {
            operation: Operation::Verify,
            method,
            url: self.config.endpoint(self.config.verify_mode.path()),
            bearer: Some(token),
            body: None,
        }
        .json(&self.http)
        .await?;

        Ok(envelope.user)
    }

    /// # Errors
    /// Returns the backend message on rejection, or the login fallback.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        Call {
            operation: Operation::Login,
            method: Method::POST,
            url: self.config.endpoint(LOGIN_PATH),
            bearer: None,
            body: Some(request),
        }
        .json(&self.http)
        .await
    }

    /// # Errors
    /// Returns the backend message on rejection, or the registration fallback.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        Call {
            operation: Operation::Register,
            method: Method::POST,
            url: self.config.endpoint(REGISTER_PATH),
            bearer: None,
            body: Some(request),
        }
        .json(&self.http)
        .await
    }

    /// # Errors
    /// Returns the backend message on rejection, or the forgot-password fallback.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), AuthError> {
        Call {
            operation: Operation::ForgotPassword,
            method: Method::POST,
            url: self.config.endpoint(FORGOT_PASSWORD_PATH),
            bearer: None,
            body: Some(request),
        }
        .empty(&self.http)
        .await
    }

    /// # Errors
    /// Returns the backend message on rejection, or the reset fallback.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AuthError> {
        Call {
            operation: Operation::ResetPassword,
            method: Method::POST,
            url: self.config.endpoint(RESET_PASSWORD_PATH),
            bearer: None,
            body: Some(request),
        }
        .empty(&self.http)
        .await
    }

    /// # Errors
    /// Returns the backend message on rejection, or the change-password fallback.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        token: &SecretString,
        request: &ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        Call {
            operation: Operation::ChangePassword,
            method: Method::POST,
            url: self.config.endpoint(CHANGE_PASSWORD_PATH),
            bearer: Some(token),
            body: Some(request),
        }
        .empty(&self.http)
        .await
    }
}
