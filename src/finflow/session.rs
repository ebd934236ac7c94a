//! Session store, bootstrapper, and credential operations.
//!
//! `SessionManager` is the single owner of the session. It publishes every
//! change on a `watch` channel so views and the route guard can follow it
//! without holding a lock; a dropped receiver (a torn-down view) never affects
//! an operation that is still in flight. The persisted token is the only
//! shared mutable resource and is written only by login, registration, logout,
//! and a failed bootstrap.

use crate::finflow::{
    client::AuthClient,
    config::{AppConfig, Registration},
    errors::{AuthError, Operation},
    storage::TokenStore,
    types::{
        ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest, Session, SessionStatus, User,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

/// Owns the session state, the auth client, and the token store. Clones share
/// the same state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    client: AuthClient,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    // Serializes bootstrap so a second caller waits instead of verifying twice.
    bootstrap: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager in the `Initializing` state.
    #[must_use]
    pub fn new(client: AuthClient, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            inner: Arc::new(Inner {
                client,
                store,
                state,
                bootstrap: Mutex::new(()),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        self.inner.client.config()
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.inner.state.borrow().status()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    /// Receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Resolves the startup session from the persisted token.
    ///
    /// Without a token the session becomes `Unauthenticated` with no network
    /// call. With one, exactly one verification request is made; any failure
    /// clears the token and leaves the session `Unauthenticated`. Only the
    /// first call does work; later calls return the settled status.
    #[instrument(skip_all)]
    pub async fn bootstrap(&self) -> SessionStatus {
        let _guard = self.inner.bootstrap.lock().await;

        let current = self.status();
        if current != SessionStatus::Initializing {
            debug!("session already bootstrapped: {current}");
            return current;
        }

        let key = &self.config().storage_key;
        let stored = match self.inner.store.get(key) {
            Ok(value) => value.filter(|token| !token.trim().is_empty()),
            Err(err) => {
                warn!("could not read persisted token, starting signed out: {err}");
                None
            }
        };

        let Some(token) = stored.map(SecretString::from) else {
            debug!("no persisted token");
            self.publish(Session::unauthenticated());
            return SessionStatus::Unauthenticated;
        };

        match self.inner.client.verify(&token).await {
            Ok(user) => {
                info!("session restored for {}", user.username);
                self.publish(Session::authenticated(user, token));
                SessionStatus::Authenticated
            }
            Err(err) => {
                warn!("token verification failed, clearing session: {err:?}");
                self.forget_token();
                self.publish(Session::unauthenticated());
                SessionStatus::Unauthenticated
            }
        }
    }

    /// Exchanges credentials for a token and authenticates the session.
    ///
    /// # Errors
    /// Returns the backend message (or `Login failed`) on rejection, and a
    /// storage error if the token cannot be persisted. The session is left
    /// unchanged on any error.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<User, AuthError> {
        self.ensure_ready()?;
        let response = self.inner.client.login(request).await?;
        self.establish(Operation::Login, response.access_token, response.user)
    }

    /// Creates an account and authenticates the session with it.
    ///
    /// # Errors
    /// Returns the configured message when registration is disabled (no
    /// request is sent), otherwise the same failures as [`Self::login`].
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        if let Registration::Disabled { message } = &self.config().registration {
            return Err(AuthError::RegistrationDisabled(message.clone()));
        }
        self.ensure_ready()?;
        let response = self.inner.client.register(request).await?;
        self.establish(Operation::Register, response.access_token, response.user)
    }

    /// Clears the persisted token and signs the session out. Safe to call in
    /// any state, any number of times.
    #[instrument(skip_all)]
    pub fn logout(&self) {
        self.forget_token();
        self.publish(Session::unauthenticated());
        debug!("signed out");
    }

    /// # Errors
    /// Returns the backend message, or `Failed to send reset email`.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), AuthError> {
        self.ensure_ready()?;
        self.inner.client.forgot_password(request).await
    }

    /// # Errors
    /// Returns the backend message, or `Password reset failed`.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AuthError> {
        self.ensure_ready()?;
        self.inner.client.reset_password(request).await
    }

    /// Changes the password of the signed-in account using the session token.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a session, otherwise the backend
    /// message or `Password change failed`.
    #[instrument(skip_all)]
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), AuthError> {
        self.ensure_ready()?;
        let token = self
            .inner
            .state
            .borrow()
            .token()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)?;
        self.inner.client.change_password(&token, request).await
    }

    fn ensure_ready(&self) -> Result<(), AuthError> {
        if self.status() == SessionStatus::Initializing {
            Err(AuthError::NotReady)
        } else {
            Ok(())
        }
    }

    /// Persists the token, then publishes the authenticated session. A blank
    /// token is a malformed response and changes nothing.
    fn establish(
        &self,
        operation: Operation,
        token: String,
        user: User,
    ) -> Result<User, AuthError> {
        if token.trim().is_empty() {
            warn!("{} response carried an empty token", operation.as_str());
            return Err(AuthError::Malformed {
                operation,
                detail: "empty access token".to_string(),
            });
        }
        let token = SecretString::from(token);
        self.inner
            .store
            .set(&self.config().storage_key, token.expose_secret())
            .inspect_err(|err| error!("could not persist token: {err}"))?;

        info!("signed in as {}", user.username);
        self.publish(Session::authenticated(user.clone(), token));
        Ok(user)
    }

    fn forget_token(&self) {
        if let Err(err) = self.inner.store.remove(&self.config().storage_key) {
            error!("could not clear persisted token: {err}");
        }
    }

    fn publish(&self, session: Session) {
        // send_replace never fails, even with no receivers left.
        self.inner.state.send_replace(session);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::finflow::{
        config::VerifyMode,
        errors::{Operation, StorageError},
        storage::{FileStore, MemoryStore},
    };
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "auth_token";

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn manager(base_url: &str, store: Arc<dyn TokenStore>) -> SessionManager {
        let config = AppConfig::new(base_url).unwrap();
        SessionManager::new(AuthClient::new(config).unwrap(), store)
    }

    fn manager_with(config: AppConfig, store: Arc<dyn TokenStore>) -> SessionManager {
        SessionManager::new(AuthClient::new(config).unwrap(), store)
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            username: "testuser".to_string(),
            password: password.to_string(),
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl TokenStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
    }

    #[tokio::test]
    async fn bootstrap_without_token_makes_no_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let manager = manager(&server.uri(), Arc::new(MemoryStore::new()));

        assert_eq!(manager.status(), SessionStatus::Initializing);
        assert_eq!(manager.bootstrap().await, SessionStatus::Unauthenticated);
        assert!(manager.session().token().is_none());

        let requests = server.received_requests().await.unwrap();
        assert!(requests.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_restores_valid_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .and(header("Authorization", "Bearer stored-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "username": "alice", "email": "a@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_value(KEY, "stored-jwt"));
        let manager = manager(&server.uri(), store.clone());

        assert_eq!(manager.bootstrap().await, SessionStatus::Authenticated);
        assert_eq!(manager.user().map(|u| u.username), Some("alice".to_string()));
        assert_eq!(
            manager.session().token().map(|t| t.expose_secret().to_string()),
            Some("stored-jwt".to_string())
        );
        assert_eq!(store.get(KEY)?.as_deref(), Some("stored-jwt"));
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_fails_closed_on_rejection() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Token expired" })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_value(KEY, "expired-jwt"));
        let manager = manager(&server.uri(), store.clone());

        assert_eq!(manager.bootstrap().await, SessionStatus::Unauthenticated);
        assert!(manager.user().is_none());
        assert_eq!(store.get(KEY)?, None);
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_fails_closed_on_malformed_success() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_value(KEY, "jwt"));
        let manager = manager(&server.uri(), store.clone());

        assert_eq!(manager.bootstrap().await, SessionStatus::Unauthenticated);
        assert_eq!(store.get(KEY)?, None);
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_fails_closed_on_network_error() -> Result<()> {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0")?;
            listener.local_addr()?.port()
        };
        let store = Arc::new(MemoryStore::with_value(KEY, "jwt"));
        let manager = manager(&format!("http://127.0.0.1:{port}"), store.clone());

        assert_eq!(manager.bootstrap().await, SessionStatus::Unauthenticated);
        assert_eq!(store.get(KEY)?, None);
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_runs_once() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "username": "alice", "email": "a@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = AppConfig::new(&server.uri())?.with_verify_mode(VerifyMode::Verify);
        let manager = manager_with(config, Arc::new(MemoryStore::with_value(KEY, "jwt")));

        let (first, second) = tokio::join!(manager.bootstrap(), manager.bootstrap());
        assert_eq!(first, SessionStatus::Authenticated);
        assert_eq!(second, SessionStatus::Authenticated);
        assert_eq!(manager.bootstrap().await, SessionStatus::Authenticated);
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_blank_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "  ",
                "user": { "id": 1, "username": "testuser", "email": "test@example.com" }
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let manager = manager(&server.uri(), store.clone());
        manager.bootstrap().await;

        let err = manager.login(&login_request("testpass")).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Malformed {
                operation: Operation::Login,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(manager.status(), SessionStatus::Unauthenticated);
        assert!(manager.session().token().is_none());
        assert_eq!(store.get(KEY)?, None);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_token_file_recovers_after_logout() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt",
                "user": { "id": 1, "username": "testuser", "email": "test@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let token_file = dir.path().join("session.json");
        std::fs::write(&token_file, "{ truncated")?;
        let store = Arc::new(FileStore::new(&token_file));
        let manager = manager(&server.uri(), store.clone());

        assert_eq!(manager.bootstrap().await, SessionStatus::Unauthenticated);
        manager.logout();
        assert_eq!(store.get(KEY)?, None);

        let user = manager.login(&login_request("testpass")).await?;
        assert_eq!(user.username, "testuser");
        assert_eq!(manager.status(), SessionStatus::Authenticated);
        assert_eq!(store.get(KEY)?.as_deref(), Some("jwt"));
        Ok(())
    }

    #[tokio::test]
    async fn login_persists_token_and_authenticates() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh-jwt",
                "user": { "id": 1, "username": "testuser", "email": "test@example.com" }
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let manager = manager(&server.uri(), store.clone());
        manager.bootstrap().await;

        let user = manager.login(&login_request("testpass")).await?;
        assert_eq!(user.username, "testuser");
        assert_eq!(manager.status(), SessionStatus::Authenticated);
        assert_eq!(store.get(KEY)?.as_deref(), Some("fresh-jwt"));
        Ok(())
    }

    #[tokio::test]
    async fn login_rejection_leaves_session_unchanged() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let manager = manager(&server.uri(), store.clone());
        manager.bootstrap().await;

        let err = manager.login(&login_request("wrong")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(manager.status(), SessionStatus::Unauthenticated);
        assert_eq!(store.get(KEY)?, None);
        Ok(())
    }

    #[tokio::test]
    async fn login_with_unparsable_error_uses_fallback() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let manager = manager(&server.uri(), Arc::new(MemoryStore::new()));
        manager.bootstrap().await;

        let err = manager.login(&login_request("testpass")).await.unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
        assert!(matches!(
            err,
            AuthError::Malformed {
                operation: Operation::Login,
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn login_storage_failure_keeps_session_signed_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh-jwt",
                "user": { "username": "testuser", "email": "test@example.com" }
            })))
            .mount(&server)
            .await;

        let manager = manager(&server.uri(), Arc::new(ReadOnlyStore));
        manager.bootstrap().await;

        let err = manager.login(&login_request("testpass")).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
        assert_eq!(manager.status(), SessionStatus::Unauthenticated);
        Ok(())
    }

    #[tokio::test]
    async fn credential_operations_wait_for_bootstrap() -> Result<()> {
        let manager = manager("http://127.0.0.1:9", Arc::new(MemoryStore::new()));

        let err = manager.login(&login_request("testpass")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotReady));

        let err = manager
            .forgot_password(&ForgotPasswordRequest {
                email: "a@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotReady));
        assert_eq!(manager.status(), SessionStatus::Initializing);
        Ok(())
    }

    #[tokio::test]
    async fn disabled_registration_fails_without_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let config = AppConfig::new(&server.uri())?.with_registration(Registration::disabled());
        let manager = manager_with(config, Arc::new(MemoryStore::new()));
        manager.bootstrap().await;

        let err = manager
            .register(&RegisterRequest {
                username: "newbie".to_string(),
                email: "newbie@example.com".to_string(),
                password: "secret1".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Registration is not available in demo mode. Please use test credentials: testuser/testpass"
        );
        assert_eq!(manager.status(), SessionStatus::Unauthenticated);
        assert!(server.received_requests().await.unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn register_authenticates_like_login() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "access_token": "new-jwt",
                "user": { "id": 9, "username": "newbie", "email": "newbie@example.com" }
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let manager = manager(&server.uri(), store.clone());
        manager.bootstrap().await;

        let user = manager
            .register(&RegisterRequest {
                username: "newbie".to_string(),
                email: "newbie@example.com".to_string(),
                password: "secret1".to_string(),
                first_name: None,
                last_name: None,
            })
            .await?;
        assert_eq!(user.id, Some(9));
        assert!(manager.session().is_authenticated());
        assert_eq!(store.get(KEY)?.as_deref(), Some("new-jwt"));
        Ok(())
    }

    #[tokio::test]
    async fn logout_is_idempotent() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let manager = manager("http://127.0.0.1:9", store.clone());
        manager.bootstrap().await;

        manager.logout();
        manager.logout();
        assert_eq!(manager.status(), SessionStatus::Unauthenticated);
        assert!(manager.session().token().is_none());
        assert_eq!(store.get(KEY)?, None);

        // Storage failures are logged, never raised.
        let manager = manager_with(AppConfig::new("http://127.0.0.1:9")?, Arc::new(ReadOnlyStore));
        manager.logout();
        assert_eq!(manager.status(), SessionStatus::Unauthenticated);
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_authenticated_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "username": "alice", "email": "a@example.com" }
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::with_value(KEY, "jwt"));
        let manager = manager(&server.uri(), store.clone());
        let mut updates = manager.subscribe();

        manager.bootstrap().await;
        assert!(updates.has_changed()?);
        assert!(updates.borrow_and_update().is_authenticated());

        manager.logout();
        assert!(!updates.borrow_and_update().is_authenticated());
        assert_eq!(store.get(KEY)?, None);
        Ok(())
    }

    #[tokio::test]
    async fn change_password_requires_session_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "username": "alice", "email": "a@example.com" }
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/change-password"))
            .and(header("Authorization", "Bearer session-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Password changed successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ChangePasswordRequest {
            current_password: "old".to_string(),
            new_password: "newpass".to_string(),
        };

        let signed_out = manager(&server.uri(), Arc::new(MemoryStore::new()));
        signed_out.bootstrap().await;
        assert!(matches!(
            signed_out.change_password(&request).await,
            Err(AuthError::NotAuthenticated)
        ));

        let signed_in = manager(
            &server.uri(),
            Arc::new(MemoryStore::with_value(KEY, "session-jwt")),
        );
        signed_in.bootstrap().await;
        signed_in.change_password(&request).await?;
        assert!(signed_in.session().is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn spawned_login_completes_after_caller_is_gone() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "access_token": "late-jwt",
                        "user": { "username": "testuser", "email": "test@example.com" }
                    }))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .mount(&server)
            .await;

        let manager = manager(&server.uri(), Arc::new(MemoryStore::new()));
        manager.bootstrap().await;

        // The "view" subscribes, starts the login, and is torn down mid-flight.
        let view = manager.subscribe();
        let task = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.login(&login_request("testpass")).await })
        };
        drop(view);

        let user = task.await??;
        assert_eq!(user.username, "testuser");
        assert!(manager.session().is_authenticated());
        Ok(())
    }
}
