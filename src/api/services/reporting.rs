use crate::api::client::ApiClient;
use crate::types::{DashboardStats, MonthlyStats, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReportingService {
    client: Arc<ApiClient>,
}

impl ReportingService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.client.get_json("/reporting/dashboard-stats").await
    }

    pub async fn monthly_stats(&self) -> Result<MonthlyStats> {
        self.client.get_json("/reporting/monthly-stats").await
    }
}
