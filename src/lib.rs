//! # FinFlow (personal finance session client)
//!
//! `finflow` is the client side of the FinFlow personal finance application.
//! It owns the authentication session lifecycle: token acquisition, token
//! verification on startup, the credential operations, and route gating for
//! the finance views (Dashboard, Expenses, Income, Budget, Wishlist, Reports,
//! Profile).
//!
//! ## Session lifecycle
//!
//! 1. **Bootstrap:** the persisted bearer token (if any) is verified against
//!    `/api/auth/profile` (or `/api/auth/verify`). Any failure clears the token.
//! 2. **Credentials:** login and registration persist the returned token and
//!    authenticate the session. Logout is local and idempotent.
//! 3. **Gating:** the route guard renders a loading indicator, the auth view,
//!    or the protected view, depending on the session status.
//!
//! The backend owns token authority; the client holds the token opaquely and
//! never logs it.

pub mod cli;
pub mod finflow;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
