//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;

use orphancare_core::adapters::memory_store::MemoryCredentialStore;
use orphancare_core::config::Config;
use orphancare_core::ports::{keys, CredentialStore};
use orphancare_core::services::{EntryPoint, LoggingService};
use orphancare_core::OrphanCareContext;

pub const ACCESS_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.access";
pub const REFRESH_TOKEN: &str = "refresh-7c1f";
pub const USER_ID: &str = "9b2e4c1a-0f3d-4d8e-a51b-2c6e7f8a9b0c";
pub const EMAIL: &str = "directrice@lumiere.cd";

pub fn config_for(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        anon_key: None,
        timeout_secs: 5,
        demo_fallback: true,
    }
}

/// Base URL nothing listens on
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn context(
    config: Config,
    dir: &Path,
    store: Arc<dyn CredentialStore>,
) -> OrphanCareContext {
    OrphanCareContext::with_store(config, dir, store, None).unwrap()
}

pub fn logged_context(
    config: Config,
    dir: &Path,
    store: Arc<dyn CredentialStore>,
) -> (OrphanCareContext, Arc<LoggingService>) {
    let logger = Arc::new(LoggingService::new(dir, EntryPoint::Cli, "test").unwrap());
    let ctx = OrphanCareContext::with_store(config, dir, store, Some(Arc::clone(&logger))).unwrap();
    (ctx, logger)
}

/// Store holding a complete credential record
pub async fn signed_in_store() -> Arc<MemoryCredentialStore> {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(keys::ACCESS_TOKEN, ACCESS_TOKEN).await.unwrap();
    store.set(keys::REFRESH_TOKEN, REFRESH_TOKEN).await.unwrap();
    store
        .set(
            keys::USER_DATA,
            &serde_json::json!({"id": USER_ID, "email": EMAIL}).to_string(),
        )
        .await
        .unwrap();
    store
}

pub fn login_body() -> String {
    serde_json::json!({
        "message": "Connexion réussie",
        "session": {
            "access_token": ACCESS_TOKEN,
            "refresh_token": REFRESH_TOKEN,
            "expires_at": 1_760_000_000,
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {"id": USER_ID, "email": EMAIL}
        },
        "user": {"id": USER_ID, "email": EMAIL, "role": "authenticated"}
    })
    .to_string()
}

pub fn bearer() -> String {
    format!("Bearer {}", ACCESS_TOKEN)
}
