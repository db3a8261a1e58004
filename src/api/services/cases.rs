use crate::api::client::ApiClient;
use crate::pension::PensionCalculation;
use crate::types::{Case, CaseId, CasePatch, CaseStatus, Result};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct CaseService {
    client: Arc<ApiClient>,
}

impl CaseService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Case>> {
        self.client.get_json("/dossiers").await
    }

    pub async fn list_by_status(&self, status: CaseStatus) -> Result<Vec<Case>> {
        self.client
            .get_json(&format!("/dossiers/statut/{}", status.as_wire()))
            .await
    }

    pub async fn get(&self, id: CaseId) -> Result<Case> {
        self.client.get_json(&format!("/dossiers/{}", id)).await
    }

    pub async fn create(&self, case: &Case) -> Result<Case> {
        case.validate()?;
        self.client.post_json("/dossiers", case).await
    }

    pub async fn update(&self, id: CaseId, patch: &CasePatch) -> Result<Case> {
        self.client.put_json(&format!("/dossiers/{}", id), patch).await
    }

    /// Status changes go through their own endpoint. Setting the same status
    /// twice leaves the case unchanged.
    pub async fn update_status(&self, id: CaseId, status: CaseStatus) -> Result<Case> {
        self.client
            .put_json(
                &format!("/dossiers/{}/statut", id),
                &json!({ "statut": status }),
            )
            .await
    }

    pub async fn delete(&self, id: CaseId) -> Result<()> {
        self.client.delete(&format!("/dossiers/{}", id)).await
    }

    /// Authoritative pension calculation, computed by the backend.
    pub async fn calculate_pension(&self, id: CaseId) -> Result<PensionCalculation> {
        self.client
            .post_for_json(&format!("/dossiers/{}/calculate-pension", id))
            .await
    }
}
