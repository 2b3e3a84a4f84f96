//! Health records resource client

use std::sync::Arc;

use crate::adapters::http::ApiClient;
use crate::domain::health::DiseaseCatalogue;
use crate::domain::result::Result;
use crate::domain::{Disease, Envelope, HealthRecord, HealthRecordList, HealthRecordPayload, Mutation};
use crate::services::request::AuthenticatedRequest;

pub struct HealthClient {
    api: Arc<ApiClient>,
    auth: AuthenticatedRequest,
}

impl HealthClient {
    pub fn new(api: Arc<ApiClient>, auth: AuthenticatedRequest) -> Self {
        Self { api, auth }
    }

    /// `GET /get-health-records/{childId}`
    pub async fn list_by_child(&self, child_id: &str) -> Result<HealthRecordList> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<HealthRecordList> = self
            .api
            .get(&["get-health-records", child_id], headers)
            .await?;
        Ok(envelope.into_inner())
    }

    pub async fn get(&self, id: &str) -> Result<HealthRecord> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<HealthRecord> = self
            .api
            .get(&["get-health-record", id], headers)
            .await?;
        Ok(envelope.into_inner())
    }

    pub async fn create(&self, child_id: &str, payload: &HealthRecordPayload) -> Result<Mutation> {
        payload.validate()?;
        let headers = self.auth.headers().await?;
        self.api
            .post(&["create-health-record", child_id], headers, payload)
            .await
    }

    pub async fn update(&self, id: &str, payload: &HealthRecordPayload) -> Result<Mutation> {
        payload.validate()?;
        let headers = self.auth.headers().await?;
        self.api
            .put(&["update-health-record", id], headers, payload)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Mutation> {
        let headers = self.auth.headers().await?;
        self.api
            .delete(&["delete-health-record", id], headers)
            .await
    }

    /// `GET /diseases`, the catalogue offered on the health form
    pub async fn list_diseases(&self) -> Result<Vec<Disease>> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<DiseaseCatalogue> = self.api.get(&["diseases"], headers).await?;
        Ok(envelope.into_inner().diseases)
    }
}
