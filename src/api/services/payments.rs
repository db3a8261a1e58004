use crate::api::client::ApiClient;
use crate::types::{CaseId, Payment, PaymentPatch, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentService {
    client: Arc<ApiClient>,
}

impl PaymentService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Payment>> {
        self.client.get_json("/paiements").await
    }

    pub async fn by_case(&self, case_id: CaseId) -> Result<Vec<Payment>> {
        self.client
            .get_json(&format!("/paiements/dossier/{}", case_id))
            .await
    }

    /// Payments are created on the collection; the owning case travels in the
    /// body as `dossierId`.
    pub async fn create(&self, case_id: CaseId, payment: &Payment) -> Result<Payment> {
        payment.validate()?;
        let mut body = payment.clone();
        body.case_id = Some(case_id);
        self.client.post_json("/paiements", &body).await
    }

    pub async fn update(&self, id: i64, patch: &PaymentPatch) -> Result<Payment> {
        patch.validate()?;
        self.client.put_json(&format!("/paiements/{}", id), patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/paiements/{}", id)).await
    }
}
