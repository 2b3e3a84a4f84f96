//! Orphanage statistics client
//!
//! The dashboard must always render something, so the fallback variant
//! substitutes the demo dataset when the live call fails. The result is
//! tagged with its source so the substitution is never silent.

use std::sync::Arc;

use crate::adapters::demo::demo_orphanage_stats;
use crate::adapters::http::ApiClient;
use crate::domain::result::Result;
use crate::domain::{DashboardStats, Envelope, OrphanageStats, StatsSource};
use crate::services::logging::{LogEvent, LoggingService};
use crate::services::request::AuthenticatedRequest;

pub struct StatsClient {
    api: Arc<ApiClient>,
    auth: AuthenticatedRequest,
    demo_fallback: bool,
    logger: Option<Arc<LoggingService>>,
}

impl StatsClient {
    pub fn new(api: Arc<ApiClient>, auth: AuthenticatedRequest) -> Self {
        Self {
            api,
            auth,
            demo_fallback: true,
            logger: None,
        }
    }

    /// Whether `get_orphanage_stats_or_demo` may substitute demo data
    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// `GET /orphanage-stats`, errors propagated
    pub async fn get_orphanage_stats(&self) -> Result<OrphanageStats> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<OrphanageStats> = self.api.get(&["orphanage-stats"], headers).await?;
        Ok(envelope.into_inner())
    }

    /// Live statistics, or the demo dataset when the live call fails
    ///
    /// Tries once. With the fallback disabled the error is returned.
    pub async fn get_orphanage_stats_or_demo(&self) -> Result<DashboardStats> {
        match self.get_orphanage_stats().await {
            Ok(stats) => Ok(DashboardStats {
                source: StatsSource::Live,
                fallback_reason: None,
                stats,
            }),
            Err(e) if self.demo_fallback => {
                if let Some(logger) = &self.logger {
                    let _ = logger.log(
                        LogEvent::new("stats_fallback")
                            .with_resource("orphanage-stats")
                            .with_error(e.to_string()),
                    );
                }
                Ok(DashboardStats {
                    source: StatsSource::Demo,
                    fallback_reason: Some(e.to_string()),
                    stats: demo_orphanage_stats(),
                })
            }
            Err(e) => Err(e),
        }
    }
}
