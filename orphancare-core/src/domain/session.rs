//! Session domain model
//!
//! A `Session` only exists when all three credential parts are present;
//! `AuthState` is the read-only view exposed to the rest of the app.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};
use super::user::User;

/// Email and password entered on the login form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the form before it is submitted
    ///
    /// Both fields are required; the email must look like an address.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }
        if !email_pattern().is_match(self.email.trim()) {
            return Err(Error::validation(format!(
                "'{}' is not a valid email address",
                self.email.trim()
            )));
        }
        Ok(())
    }
}

/// The currently authenticated actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
    access_token: String,
    refresh_token: String,
}

impl Session {
    /// Build a session, refusing empty tokens or an empty user id
    pub fn new(
        user: User,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Option<Self> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        if user.id.is_empty() || access_token.is_empty() || refresh_token.is_empty() {
            return None;
        }
        Some(Self {
            user,
            access_token,
            refresh_token,
        })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Persisted alongside the access token but never exchanged
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

/// Lifecycle phase of the session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Restoring,
    Authenticated,
    Unauthenticated,
}

/// Observable authentication state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthState {
    /// State at process start, before restore has run
    pub fn initial() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    pub fn loading(phase: SessionPhase) -> Self {
        Self {
            phase,
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    pub fn signed_in(session: &Session) -> Self {
        Self {
            phase: SessionPhase::Authenticated,
            user: Some(session.user().clone()),
            is_authenticated: true,
            is_loading: false,
        }
    }
}

/// Token block inside the login response
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `POST /login` success body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session: Option<SessionTokens>,
    #[serde(default)]
    pub user: Option<User>,
}

impl LoginResponse {
    /// Turn the response into a session, if it carries everything needed
    ///
    /// The top-level `user` wins; the one nested in `session` is a fallback.
    pub fn into_session(self) -> Option<Session> {
        let tokens = self.session?;
        let user = self.user.or(tokens.user)?;
        Session::new(user, tokens.access_token?, tokens.refresh_token?)
    }
}
