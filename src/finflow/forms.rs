//! Caller-side validation for the auth forms. Each form checks its fields
//! before any network call and converts into the request payload; the backend
//! still validates everything again.

use crate::finflow::{
    errors::AuthError,
    types::{
        ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest,
    },
};
use regex::Regex;

/// Matches the backend's password rule.
pub const MIN_PASSWORD_LEN: usize = 6;

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

fn required(value: &str, message: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

fn new_password(password: &str, confirmation: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirmation {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

#[derive(Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    /// Returns a validation error when either field is blank.
    pub fn validate(&self) -> Result<LoginRequest, AuthError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        Ok(LoginRequest {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RegisterForm {
    /// # Errors
    /// Returns a validation error for missing fields, a malformed email, a
    /// short password, or a mismatched confirmation.
    pub fn validate(&self) -> Result<RegisterRequest, AuthError> {
        required(&self.username, "Username is required")?;
        required(&self.email, "Email is required")?;
        let email = self.email.trim();
        if !valid_email(email) {
            return Err(AuthError::Validation("Invalid email format".to_string()));
        }
        new_password(&self.password, &self.confirm_password)?;

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            first_name: optional(self.first_name.as_deref()),
            last_name: optional(self.last_name.as_deref()),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    /// # Errors
    /// Returns a validation error for a blank or malformed email.
    pub fn validate(&self) -> Result<ForgotPasswordRequest, AuthError> {
        required(&self.email, "Email is required")?;
        let email = self.email.trim();
        if !valid_email(email) {
            return Err(AuthError::Validation("Invalid email format".to_string()));
        }
        Ok(ForgotPasswordRequest {
            email: email.to_string(),
        })
    }
}

#[derive(Clone, Default)]
pub struct ResetPasswordForm {
    pub reset_token: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// # Errors
    /// Returns a validation error for a missing token, a short password, or a
    /// mismatched confirmation.
    pub fn validate(&self) -> Result<ResetPasswordRequest, AuthError> {
        required(&self.reset_token, "Reset token is required")?;
        new_password(&self.new_password, &self.confirm_password)?;
        Ok(ResetPasswordRequest {
            reset_token: self.reset_token.trim().to_string(),
            new_password: self.new_password.clone(),
        })
    }
}

#[derive(Clone, Default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// # Errors
    /// Returns a validation error for a missing current password, a short new
    /// password, or a mismatched confirmation.
    pub fn validate(&self) -> Result<ChangePasswordRequest, AuthError> {
        if self.current_password.is_empty() {
            return Err(AuthError::Validation(
                "Current password is required".to_string(),
            ));
        }
        new_password(&self.new_password, &self.confirm_password)?;
        Ok(ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}
