//! OrphanCare Core - client logic for the orphanage-care management API
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Session, ChildSummary, HealthRecord, ...) and errors
//! - **ports**: Trait definitions for external dependencies (CredentialStore)
//! - **services**: Session manager and resource clients
//! - **adapters**: Concrete implementations (credential files, HTTP, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::file_store::FileCredentialStore;
use adapters::http::ApiClient;
use config::Config;
use ports::CredentialStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{AuthState, Credentials, DashboardStats, Session, StatsSource, User};

/// Main context for OrphanCare operations
///
/// Holds the configuration, the shared credential store and one handle per
/// service. There is no global state: front ends keep this context and pass
/// the handles they need.
pub struct OrphanCareContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<dyn CredentialStore>,
    pub session: Arc<SessionManager>,
    pub children: ChildrenClient,
    pub health: HealthClient,
    pub nutrition: NutritionClient,
    pub stats: StatsClient,
    pub logger: Option<Arc<LoggingService>>,
}

impl OrphanCareContext {
    /// Create a context backed by the credential file in `data_dir`
    pub fn new(data_dir: &Path, logger: Option<Arc<LoggingService>>) -> Result<Self> {
        let config = Config::load(data_dir).map_err(|e| Error::Config(e.to_string()))?;
        let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(data_dir));
        Self::with_store(config, data_dir, store, logger)
    }

    /// Create a context on an arbitrary credential store
    pub fn with_store(
        config: Config,
        data_dir: &Path,
        store: Arc<dyn CredentialStore>,
        logger: Option<Arc<LoggingService>>,
    ) -> Result<Self> {
        let api = Arc::new(ApiClient::from_config(&config)?.with_logger(logger.clone()));
        let auth = AuthenticatedRequest::new(Arc::clone(&store));

        let session = Arc::new(
            SessionManager::new(Arc::clone(&api), Arc::clone(&store)).with_logger(logger.clone()),
        );
        let children = ChildrenClient::new(Arc::clone(&api), auth.clone());
        let health = HealthClient::new(Arc::clone(&api), auth.clone());
        let nutrition = NutritionClient::new(Arc::clone(&api), auth.clone());
        let stats = StatsClient::new(api, auth)
            .with_demo_fallback(config.demo_fallback)
            .with_logger(logger.clone());

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            store,
            session,
            children,
            health,
            nutrition,
            stats,
            logger,
        })
    }
}
