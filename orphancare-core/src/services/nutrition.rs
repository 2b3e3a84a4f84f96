//! Nutrition records resource client

use std::sync::Arc;

use crate::adapters::http::ApiClient;
use crate::domain::result::Result;
use crate::domain::{Envelope, Mutation, NutritionPayload, NutritionRecord, NutritionRecordList};
use crate::services::request::AuthenticatedRequest;

pub struct NutritionClient {
    api: Arc<ApiClient>,
    auth: AuthenticatedRequest,
}

impl NutritionClient {
    pub fn new(api: Arc<ApiClient>, auth: AuthenticatedRequest) -> Self {
        Self { api, auth }
    }

    /// `GET /nutrition-records/{childId}`
    pub async fn list_by_child(&self, child_id: &str) -> Result<NutritionRecordList> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<NutritionRecordList> = self
            .api
            .get(&["nutrition-records", child_id], headers)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Record detail; `bmi` is the value computed by the server
    pub async fn get(&self, id: &str) -> Result<NutritionRecord> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<NutritionRecord> = self
            .api
            .get(&["nutrition-record", id], headers)
            .await?;
        Ok(envelope.into_inner())
    }

    pub async fn create(&self, child_id: &str, payload: &NutritionPayload) -> Result<Mutation> {
        payload.validate()?;
        let headers = self.auth.headers().await?;
        self.api
            .post(&["create-nutrition-record", child_id], headers, payload)
            .await
    }

    pub async fn update(&self, id: &str, payload: &NutritionPayload) -> Result<Mutation> {
        payload.validate()?;
        let headers = self.auth.headers().await?;
        self.api
            .put(&["update-nutrition-record", id], headers, payload)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Mutation> {
        let headers = self.auth.headers().await?;
        self.api
            .delete(&["delete-nutrition-record", id], headers)
            .await
    }
}
