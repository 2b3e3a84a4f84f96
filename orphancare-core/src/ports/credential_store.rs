//! Credential store port - secure key-value persistence

use async_trait::async_trait;

use crate::domain::result::Result;

/// Fixed key names of the credential record
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER_DATA: &str = "user_data";

    /// All three keys, in the order they are written on login
    pub const ALL: [&str; 3] = [ACCESS_TOKEN, REFRESH_TOKEN, USER_DATA];
}

/// Durable storage of named string values
///
/// Keys are independent; there is no multi-key transaction. A crash in the
/// middle of writing the credential record may leave it partially written.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Read `key`; `Ok(None)` when absent, `Err` only when the medium fails
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Delete `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
