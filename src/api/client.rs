//! HTTP gateway to the case-management REST backend.
//!
//! Every request carries the stored bearer token when there is one. Every
//! response passes through [`ApiClient::check`]: a 401 from any endpoint sends
//! the navigator to the identity-provider login page before the error is
//! returned to the caller.

use crate::auth::redirect::Navigator;
use crate::auth::token_store::TokenStore;
use crate::types::{AppError, Result};
use crate::utils::toml_config::DeskConfig;
use reqwest::{multipart, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    login_url: String,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        login_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        // No timeout: a hung backend leaves the caller waiting, as the web
        // client did.
        let http = reqwest::Client::builder()
            .user_agent(concat!("pension-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            login_url: login_url.into(),
            tokens,
            navigator,
        })
    }

    pub fn from_config(
        config: &DeskConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::new(
            config.api.base_url.clone(),
            config.identity.login_url.clone(),
            tokens,
            navigator,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Absolute URL for an API path such as `/dossiers/3`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, "Request failed: {}", e);
            AppError::Network(e.to_string())
        })?;
        debug!(%method, path, status = response.status().as_u16(), "API response");
        self.check(response).await
    }

    /// Map non-2xx responses to errors, escalating 401 to a login redirect.
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("Received 401, redirecting to identity provider login");
            self.navigator.redirect(&self.login_url);
            return Err(AppError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        Err(match status {
            StatusCode::FORBIDDEN => AppError::Forbidden(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path);
        let response = self.send(Method::GET, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(Method::GET, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(Method::POST, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.send(Method::PUT, path, builder).await?;
        Self::decode(response).await
    }

    /// POST without a body, response content ignored.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::POST, path);
        self.send(Method::POST, path, builder).await?;
        Ok(())
    }

    /// POST without a body, decoding the response.
    pub async fn post_for_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::POST, path);
        let response = self.send(Method::POST, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, builder).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path).multipart(form);
        let response = self.send(Method::POST, path, builder).await?;
        Self::decode(response).await
    }

    /// Raw response body, for binary downloads.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let builder = self.request(Method::GET, path);
        let response = self.send(Method::GET, path, builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Extract a readable message from an error body of the shape
/// `{"error": "..."}` or `{"message": "..."}`.
fn error_message(status: StatusCode, body: &str) -> String {
    let mined = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });

    mined
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::redirect::RecordingNavigator;
    use crate::auth::token_store::MemoryTokenStore;

    #[test]
    fn test_error_message_prefers_error_field() {
        let msg = error_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "Erreur lors du calcul"}"#,
        );
        assert_eq!(msg, "Erreur lors du calcul");
    }

    #[test]
    fn test_error_message_uses_message_field() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"message": "bad statut"}"#);
        assert_eq!(msg, "bad statut");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let msg = error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(msg, "502 Bad Gateway");
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(
            "http://localhost:8088/api/",
            "http://localhost:8088/login",
            Arc::new(MemoryTokenStore::new()),
            Arc::new(RecordingNavigator::new()),
        )
        .expect("client");

        assert_eq!(client.url("/dossiers/3"), "http://localhost:8088/api/dossiers/3");
        assert_eq!(client.url("auth/me"), "http://localhost:8088/api/auth/me");
    }
}
