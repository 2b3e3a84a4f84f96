//! Children resource client

use std::sync::Arc;

use crate::adapters::http::ApiClient;
use crate::domain::result::Result;
use crate::domain::{ChildDetail, ChildPayload, ChildrenList, Envelope, Mutation};
use crate::services::request::AuthenticatedRequest;

pub struct ChildrenClient {
    api: Arc<ApiClient>,
    auth: AuthenticatedRequest,
}

impl ChildrenClient {
    pub fn new(api: Arc<ApiClient>, auth: AuthenticatedRequest) -> Self {
        Self { api, auth }
    }

    /// `GET /children`
    pub async fn list(&self) -> Result<ChildrenList> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<ChildrenList> = self.api.get(&["children"], headers).await?;
        Ok(envelope.into_inner())
    }

    /// `GET /child/{id}` with nested nutrition, health and disease rows
    pub async fn get(&self, id: &str) -> Result<ChildDetail> {
        let headers = self.auth.headers().await?;
        let envelope: Envelope<ChildDetail> =
            self.api.get(&["child", id], headers).await?;
        Ok(envelope.into_inner())
    }

    pub async fn create(&self, payload: &ChildPayload) -> Result<Mutation> {
        payload.validate()?;
        let headers = self.auth.headers().await?;
        self.api.post(&["children-create"], headers, payload).await
    }

    pub async fn update(&self, id: &str, payload: &ChildPayload) -> Result<Mutation> {
        payload.validate()?;
        let headers = self.auth.headers().await?;
        self.api
            .put(&["update-child", id], headers, payload)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Mutation> {
        let headers = self.auth.headers().await?;
        self.api.delete(&["delete-child", id], headers).await
    }
}
