//! Session manager - owns the authenticated session
//!
//! Lifecycle: `Uninitialized -> Restoring -> {Authenticated, Unauthenticated}`.
//! The state is published on a watch channel so front ends can react to
//! login and logout without polling.

use std::sync::Arc;

use tokio::sync::watch;

use crate::adapters::http::ApiClient;
use crate::domain::result::{Error, Result};
use crate::domain::{AuthState, Credentials, Session, SessionPhase, User};
use crate::ports::{keys, CredentialStore};
use crate::services::logging::{LogEvent, LoggingService};

pub struct SessionManager {
    api: Arc<ApiClient>,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<AuthState>,
    logger: Option<Arc<LoggingService>>,
}

impl SessionManager {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(AuthState::initial());
        Self {
            api,
            store,
            state,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every state change from now on
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Rebuild the session from the credential store
    ///
    /// Never fails: a missing, partial or unreadable record leaves the
    /// manager unauthenticated.
    pub async fn restore(&self) -> AuthState {
        self.state
            .send_replace(AuthState::loading(SessionPhase::Restoring));

        let next = match self.load_stored_session().await {
            Ok(Some(session)) => {
                self.log(LogEvent::new("session_restored").with_user(&session.user().id));
                AuthState::signed_in(&session)
            }
            Ok(None) => AuthState::signed_out(),
            Err(e) => {
                self.log(LogEvent::new("session_restore_failed").with_error(e.to_string()));
                AuthState::signed_out()
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    async fn load_stored_session(&self) -> Result<Option<Session>> {
        let access = self.store.get(keys::ACCESS_TOKEN).await?;
        let refresh = self.store.get(keys::REFRESH_TOKEN).await?;
        let user_data = self.store.get(keys::USER_DATA).await?;

        let (Some(access), Some(refresh), Some(user_data)) = (access, refresh, user_data) else {
            return Ok(None);
        };
        if user_data.is_empty() {
            return Ok(None);
        }

        let user: User = serde_json::from_str(&user_data)
            .map_err(|e| Error::storage(format!("Stored user record is unreadable: {}", e)))?;
        Ok(Session::new(user, access, refresh))
    }

    /// Authenticate and persist the new session
    ///
    /// `is_loading` is set while the request is in flight. On any failure
    /// the stored credentials are cleared and the manager ends
    /// unauthenticated.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        self.state.send_replace(AuthState {
            is_loading: true,
            ..self.state()
        });

        match self.try_login(credentials).await {
            Ok(session) => {
                self.log(LogEvent::new("login_succeeded").with_user(&session.user().id));
                self.state.send_replace(AuthState::signed_in(&session));
                Ok(session.user().clone())
            }
            Err(e) => {
                self.log(LogEvent::new("login_failed").with_error(e.to_string()));
                self.clear_stored("login_storage_failed").await;
                self.state.send_replace(AuthState::signed_out());
                Err(e)
            }
        }
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<Session> {
        let response = self.api.login(credentials).await?;
        let session = response.into_session().ok_or_else(|| {
            Error::LoginFailed("Server response did not include a complete session".to_string())
        })?;

        let user_json = serde_json::to_string(session.user())?;
        self.store
            .set(keys::ACCESS_TOKEN, session.access_token())
            .await?;
        self.store
            .set(keys::REFRESH_TOKEN, session.refresh_token())
            .await?;
        self.store.set(keys::USER_DATA, &user_json).await?;

        Ok(session)
    }

    /// Clear the stored credentials and end unauthenticated
    ///
    /// Storage failures are logged, never returned.
    pub async fn logout(&self) {
        let user = self.current_user();
        self.clear_stored("logout_storage_failed").await;

        let mut event = LogEvent::new("logout");
        if let Some(user) = &user {
            event = event.with_user(&user.id);
        }
        self.log(event);
        self.state.send_replace(AuthState::signed_out());
    }

    async fn clear_stored(&self, failure_event: &str) {
        for key in keys::ALL {
            if let Err(e) = self.store.remove(key).await {
                self.log(
                    LogEvent::new(failure_event)
                        .with_error(e.to_string())
                        .with_error_details(format!("key={}", key)),
                );
            }
        }
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::MemoryCredentialStore;
    use std::time::Duration;

    fn manager(store: Arc<MemoryCredentialStore>) -> SessionManager {
        // Unroutable address: these tests never reach the network
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        SessionManager::new(Arc::new(api), store)
    }

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let manager = manager(Arc::new(MemoryCredentialStore::new()));
        let state = manager.state();
        assert_eq!(state.phase, SessionPhase::Uninitialized);
        assert!(state.is_loading);
        assert!(!state.is_authenticated);
    }

    #[tokio::test]
    async fn test_restore_complete_record() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(keys::ACCESS_TOKEN, "acc").await.unwrap();
        store.set(keys::REFRESH_TOKEN, "ref").await.unwrap();
        store
            .set(keys::USER_DATA, r#"{"id":"u1","email":"staff@lumiere.cd"}"#)
            .await
            .unwrap();

        let manager = manager(store);
        let mut rx = manager.subscribe();
        let state = manager.restore().await;

        assert!(state.is_authenticated);
        assert_eq!(state.user.unwrap().id, "u1");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().phase, SessionPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_restore_corrupt_user_is_unauthenticated() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(keys::ACCESS_TOKEN, "acc").await.unwrap();
        store.set(keys::REFRESH_TOKEN, "ref").await.unwrap();
        store.set(keys::USER_DATA, "{not json").await.unwrap();

        let state = manager(store).restore().await;
        assert_eq!(state.phase, SessionPhase::Unauthenticated);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_restore_unreadable_store_is_unauthenticated() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.fail_reads(true);
        let state = manager(store).restore().await;
        assert!(!state.is_authenticated);
    }

    #[tokio::test]
    async fn test_login_transport_failure_is_login_failed() {
        let manager = manager(Arc::new(MemoryCredentialStore::new()));
        let err = manager
            .login(&Credentials::new("staff@lumiere.cd", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LoginFailed(_)));
        assert_eq!(manager.state().phase, SessionPhase::Unauthenticated);
        assert!(!manager.state().is_loading);
    }

    #[tokio::test]
    async fn test_failed_login_clears_previous_session() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(keys::ACCESS_TOKEN, "acc").await.unwrap();
        store.set(keys::REFRESH_TOKEN, "ref").await.unwrap();
        store
            .set(keys::USER_DATA, r#"{"id":"u1","email":"staff@lumiere.cd"}"#)
            .await
            .unwrap();

        let manager = manager(Arc::clone(&store));
        assert!(manager.restore().await.is_authenticated);

        assert!(manager
            .login(&Credentials::new("other@lumiere.cd", "secret"))
            .await
            .is_err());
        assert!(!manager.is_authenticated());
        assert!(store.is_empty().await);
        assert!(!manager.restore().await.is_authenticated);
    }
}
