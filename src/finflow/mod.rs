//! Session core: identity types, token persistence, the auth API client, the
//! session manager, caller-side form validation, and the route guard. Nothing
//! in here renders UI; views consume the session through `SessionManager` and
//! `RouteGuard`. Token material must never reach a log line.

pub(crate) mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod forms;
pub mod guard;
pub mod session;
pub mod storage;
pub mod types;

pub use self::client::AuthClient;
pub use self::config::{AppConfig, Registration, VerifyMode};
pub use self::errors::{AuthError, ConfigError, Operation, StorageError};
pub use self::guard::{GuardState, Rendered, RouteGuard, View};
pub use self::session::SessionManager;
pub use self::storage::{FileStore, MemoryStore, TokenStore};
pub use self::types::{Session, SessionStatus, User};
