//! Authenticated request headers
//!
//! Every resource call reads the access token from the credential store
//! at call time, so a logout or re-login elsewhere is seen immediately.

use std::sync::Arc;

use reqwest::header::HeaderMap;

use crate::adapters::http::bearer_headers;
use crate::domain::result::{Error, Result};
use crate::ports::{keys, CredentialStore};

#[derive(Clone)]
pub struct AuthenticatedRequest {
    store: Arc<dyn CredentialStore>,
}

impl AuthenticatedRequest {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Headers for an authenticated call
    ///
    /// Fails with `NoSession` when no access token is stored, before any
    /// request is made.
    pub async fn headers(&self) -> Result<HeaderMap> {
        let token = self
            .store
            .get(keys::ACCESS_TOKEN)
            .await?
            .filter(|t| !t.is_empty())
            .ok_or(Error::NoSession)?;
        bearer_headers(&token)
    }
}
