//! reqwest helpers for the auth API with one response policy shared by every
//! call. Helpers attach the bearer token only when a caller passes one and
//! never record request bodies or headers.

use crate::finflow::{
    errors::{AuthError, Operation},
    types::ErrorBody,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{Instrument, debug, info_span, warn};

/// Builds the shared client. No timeout is set; the transport default applies.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub(crate) fn client() -> reqwest::Result<Client> {
    Client::builder().user_agent(crate::APP_USER_AGENT).build()
}

/// One outbound exchange: method, URL, optional bearer token, optional JSON body.
pub(crate) struct Call<'a, B: Serialize> {
    pub operation: Operation,
    pub method: Method,
    pub url: String,
    pub bearer: Option<&'a SecretString>,
    pub body: Option<&'a B>,
}

impl<B: Serialize> Call<'_, B> {
    fn build(&self, client: &Client) -> RequestBuilder {
        let mut builder = client
            .request(self.method.clone(), &self.url)
            .header("Content-Type", "application/json");

        if let Some(token) = self.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = self.body {
            builder = builder.json(body);
        }

        builder
    }

    /// Sends the request and decodes a JSON success body into `T`.
    pub(crate) async fn json<T: DeserializeOwned>(self, client: &Client) -> Result<T, AuthError> {
        let operation = self.operation;
        let response = self.send(client).await?;
        handle_json_response(operation, response).await
    }

    /// Sends the request and accepts any OK response, ignoring its body.
    pub(crate) async fn empty(self, client: &Client) -> Result<(), AuthError> {
        let operation = self.operation;
        let response = self.send(client).await?;
        handle_empty_response(operation, response).await
    }

    async fn send(self, client: &Client) -> Result<Response, AuthError> {
        let span = info_span!(
            "auth.request",
            operation = self.operation.as_str(),
            http.method = %self.method,
            url = %self.url
        );

        let operation = self.operation;
        self.build(client)
            .send()
            .instrument(span)
            .await
            .map_err(|source| {
                warn!("{} request failed: {source}", operation.as_str());
                AuthError::Transport { operation, source }
            })
    }
}

/// Decodes OK responses into `T`; anything else becomes a surfaced error.
async fn handle_json_response<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, AuthError> {
    let status = response.status();
    if !status.is_success() {
        return Err(rejection(operation, response).await);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| AuthError::Transport { operation, source })?;

    serde_json::from_slice::<T>(&bytes).map_err(|err| {
        debug!("{} response body rejected: {err}", operation.as_str());
        AuthError::Malformed {
            operation,
            detail: format!("Failed to decode response: {err}"),
        }
    })
}

async fn handle_empty_response(operation: Operation, response: Response) -> Result<(), AuthError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(rejection(operation, response).await)
    }
}

/// Maps a non-OK response to `Rejected` when the body carries an `error`
/// string, and to `Malformed` (operation fallback) otherwise.
async fn rejection(operation: Operation, response: Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();
    error_from_body(operation, status, &body)
}

pub(crate) fn error_from_body(operation: Operation, status: u16, body: &[u8]) -> AuthError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => match parsed.message() {
            Some(message) => AuthError::Rejected {
                status,
                message: message.to_string(),
            },
            None => AuthError::Malformed {
                operation,
                detail: format!("HTTP {status} without an error message"),
            },
        },
        Err(err) => AuthError::Malformed {
            operation,
            detail: format!("HTTP {status} with unreadable body: {err}"),
        },
    }
}
