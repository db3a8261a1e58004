use crate::api::client::ApiClient;
use crate::types::{Career, CareerPatch, CaseId, PensionRegime, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct CareerService {
    client: Arc<ApiClient>,
}

impl CareerService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Career>> {
        self.client.get_json("/carrieres").await
    }

    pub async fn get(&self, id: i64) -> Result<Career> {
        self.client.get_json(&format!("/carrieres/{}", id)).await
    }

    pub async fn by_case(&self, case_id: CaseId) -> Result<Vec<Career>> {
        self.client
            .get_json(&format!("/carrieres/dossier/{}", case_id))
            .await
    }

    pub async fn by_regime(&self, regime: PensionRegime) -> Result<Vec<Career>> {
        self.client
            .get_json(&format!("/carrieres/regime/{}", regime.as_wire()))
            .await
    }

    pub async fn search_by_employer(&self, employer: &str) -> Result<Vec<Career>> {
        self.client
            .get_json_with_query("/carrieres/search", &[("entreprise", employer)])
            .await
    }

    /// Creates the career under `case_id`, whatever `career.case_id` says.
    pub async fn create(&self, case_id: CaseId, career: &Career) -> Result<Career> {
        career.validate()?;
        let mut body = career.clone();
        body.case_id = Some(case_id);
        self.client
            .post_json(&format!("/carrieres/dossier/{}", case_id), &body)
            .await
    }

    pub async fn update(&self, id: i64, patch: &CareerPatch) -> Result<Career> {
        patch.validate()?;
        self.client.put_json(&format!("/carrieres/{}", id), patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/carrieres/{}", id)).await
    }
}
