//! Route gating for the finance views.
//!
//! The guard is a three-state machine driven purely by the session status:
//! `Loading` while the bootstrapper runs, then exactly one transition to
//! `Denied` or `Granted`. Each evaluation yields exactly one thing to render.
//! This is UX gating only; the backend enforces access on every API call.

use crate::finflow::types::{Session, SessionStatus};
use std::fmt;
use tokio::sync::watch;

/// Protected application views, in sidebar order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Expenses,
    Income,
    Budget,
    Wishlist,
    Reports,
    Profile,
}

impl View {
    pub const ALL: [Self; 7] = [
        Self::Dashboard,
        Self::Expenses,
        Self::Income,
        Self::Budget,
        Self::Wishlist,
        Self::Reports,
        Self::Profile,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Expenses => "/expenses",
            Self::Income => "/income",
            Self::Budget => "/budget",
            Self::Wishlist => "/wishlist",
            Self::Reports => "/reports",
            Self::Profile => "/profile",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Expenses => "Expenses",
            Self::Income => "Income",
            Self::Budget => "Budget",
            Self::Wishlist => "Wishlist",
            Self::Reports => "Reports",
            Self::Profile => "Profile",
        }
    }

    /// Resolves a route path; unknown paths are `None` (not found). Trailing
    /// slashes, query strings, and fragments are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        Self::ALL
            .into_iter()
            .find(|view| view.path().eq_ignore_ascii_case(normalized))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Denied,
    Granted,
}

impl From<SessionStatus> for GuardState {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Initializing => Self::Loading,
            SessionStatus::Unauthenticated => Self::Denied,
            SessionStatus::Authenticated => Self::Granted,
        }
    }
}

/// What the shell shows for a requested view. Exactly one per evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rendered {
    Loading,
    AuthView,
    Protected(View),
}

impl Rendered {
    #[must_use]
    pub const fn for_state(state: GuardState, requested: View) -> Self {
        match state {
            GuardState::Loading => Self::Loading,
            GuardState::Denied => Self::AuthView,
            GuardState::Granted => Self::Protected(requested),
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading..."),
            Self::AuthView => f.write_str("Sign in to FinFlow"),
            Self::Protected(view) => write!(f, "{view}"),
        }
    }
}

/// Gate in front of the protected views, following the session channel.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: watch::Receiver<Session>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: watch::Receiver<Session>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.session.borrow().status().into()
    }

    #[must_use]
    pub fn render(&self, requested: View) -> Rendered {
        Rendered::for_state(self.state(), requested)
    }

    /// Waits for the session to leave `Initializing` and returns the settled
    /// state. Returns immediately when already settled. If the session owner
    /// is dropped first, the guard stays where it is.
    pub async fn settled(&mut self) -> GuardState {
        let settled = self
            .session
            .wait_for(|session| session.status() != SessionStatus::Initializing)
            .await
            .map(|session| session.status());

        match settled {
            Ok(status) => status.into(),
            Err(_) => self.state(),
        }
    }
}
