use chrono::{DateTime, Utc};

use crate::models::{OAuthResponse, User};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    NotAuthenticated,
    Exchanging,
    Refreshing,
    Authenticated,
}

/// Caller-owned credential state.
///
/// The exchange flow itself is stateless; whoever drives it keeps the token
/// and user here and steps the state machine around each operation:
/// `NotAuthenticated -> Exchanging -> Authenticated` on code exchange and
/// `Authenticated -> Refreshing -> Authenticated | NotAuthenticated` on
/// session refresh.
#[derive(Debug, Default)]
pub struct CredentialStore {
    state: AuthState,
    token: Option<String>,
    user: Option<User>,
    refreshed_on: Option<DateTime<Utc>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// When the current token was last obtained or refreshed.
    pub fn refreshed_on(&self) -> Option<DateTime<Utc>> {
        self.refreshed_on
    }

    pub fn is_logged_in(&self) -> bool {
        self.state == AuthState::Authenticated && self.token.is_some()
    }

    pub fn is_logging_in(&self) -> bool {
        matches!(self.state, AuthState::Exchanging | AuthState::Refreshing)
    }

    pub fn begin_exchange(&mut self) {
        self.state = AuthState::Exchanging;
    }

    pub fn begin_refresh(&mut self) {
        self.state = AuthState::Refreshing;
    }

    pub fn complete(&mut self, response: OAuthResponse) {
        self.token = Some(response.token);
        self.user = Some(response.user);
        self.refreshed_on = Some(Utc::now());
        self.state = AuthState::Authenticated;
    }

    pub fn fail(&mut self) {
        self.logout();
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
        self.refreshed_on = None;
        self.state = AuthState::NotAuthenticated;
    }
}
