use crate::api::client::ApiClient;
use crate::types::Result;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /auth/me`. The payload shape depends on how the backend
    /// authenticated the caller, so it is returned untyped.
    pub async fn current_user(&self) -> Result<Value> {
        self.client.get_json("/auth/me").await
    }

    /// `POST /auth/logout`
    pub async fn logout(&self) -> Result<()> {
        self.client.post_empty("/auth/logout").await
    }
}
