//! Authenticated-user state.
//!
//! The session is rebuilt from a single `GET /auth/me` probe and lives only
//! as long as the [`AppContext`](crate::AppContext) that owns it. There is no
//! background refresh; call [`SessionStore::check_auth_status`] again to
//! re-probe.

use super::redirect::{IdentityUrls, Navigator};
use super::token_store::TokenStore;
use crate::api::services::AuthService;
use crate::types::{AppError, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The signed-in user as derived from the probe payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub is_admin: bool,
    pub is_user: bool,
}

impl SessionUser {
    /// Build the user from a `/auth/me` payload.
    pub fn from_probe(payload: &Value) -> Self {
        let roles = extract_roles(payload);
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let is_admin = roles
            .iter()
            .any(|r| r.to_lowercase().contains("admin") || r.contains("client_admin"));
        let is_user = roles
            .iter()
            .any(|r| r.to_lowercase().contains("user") || r.contains("client_employee"));

        Self {
            id: text("name")
                .or_else(|| text("sub"))
                .unwrap_or_else(|| "unknown".to_string()),
            username: text("preferred_username")
                .or_else(|| text("name"))
                .unwrap_or_else(|| "user".to_string()),
            email: text("email").unwrap_or_default(),
            roles,
            is_admin,
            is_user,
        }
    }
}

/// Flatten `authorities` (strings or `{authority}` objects),
/// `attributes.roles` and the top-level `roles` list into one
/// de-duplicated list, first occurrence wins.
pub fn extract_roles(payload: &Value) -> Vec<String> {
    let mut collected: Vec<String> = Vec::new();

    if let Some(authorities) = payload.get("authorities").and_then(Value::as_array) {
        for authority in authorities {
            let role = match authority {
                Value::String(s) => Some(s.as_str()),
                Value::Object(_) => authority.get("authority").and_then(Value::as_str),
                _ => None,
            };
            if let Some(role) = role {
                collected.push(role.to_string());
            }
        }
    }

    let role_lists = [
        payload.pointer("/attributes/roles"),
        payload.get("roles"),
    ];
    for list in role_lists.into_iter().flatten() {
        if let Some(items) = list.as_array() {
            collected.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
        }
    }

    let mut roles: Vec<String> = Vec::with_capacity(collected.len());
    for role in collected {
        if !role.is_empty() && !roles.contains(&role) {
            roles.push(role);
        }
    }
    roles
}

pub struct SessionStore {
    auth: AuthService,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    urls: IdentityUrls,
    user: Option<SessionUser>,
    loading: bool,
}

impl SessionStore {
    /// A store that has not probed yet: no user, loading.
    pub fn new(
        auth: AuthService,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        urls: IdentityUrls,
    ) -> Self {
        Self {
            auth,
            tokens,
            navigator,
            urls,
            user: None,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Probe `/auth/me` and rebuild the user.
    ///
    /// On 403 the navigator is sent to the login page. A 401 has already
    /// been redirected by the gateway client, so it is not redirected twice.
    /// Any other failure leaves the session unauthenticated.
    pub async fn check_auth_status(&mut self) -> Option<&SessionUser> {
        self.loading = true;

        let probe = self.auth.current_user().await;
        self.user = match probe {
            Ok(payload) => {
                if payload.get("authenticated").and_then(Value::as_bool) == Some(false) {
                    info!("Backend reports no authenticated user");
                    None
                } else {
                    let user = SessionUser::from_probe(&payload);
                    debug!(user = %user.username, roles = ?user.roles, "Session established");
                    Some(user)
                }
            }
            Err(AppError::Unauthorized) => {
                warn!("Authentication probe rejected with 401");
                None
            }
            Err(AppError::Forbidden(message)) => {
                warn!("Authentication probe rejected with 403: {}", message);
                self.navigator.redirect(&self.urls.login);
                None
            }
            Err(e) => {
                warn!("Authentication probe failed: {}", e);
                None
            }
        };

        self.loading = false;
        self.user.as_ref()
    }

    /// Send the user to the identity-provider login page.
    pub fn login(&self) {
        self.navigator.redirect(&self.urls.login);
    }

    /// Store a bearer token obtained from the identity provider.
    pub fn store_token(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Validation("token cannot be empty".to_string()));
        }
        self.tokens.save(token)
    }

    /// Best-effort backend logout, then local teardown and a redirect to the
    /// identity-provider logout page. Errors from the backend call are
    /// swallowed.
    pub async fn logout(&mut self) {
        if let Err(e) = self.auth.logout().await {
            warn!("Backend logout failed: {}", e);
        }

        self.user = None;
        if let Err(e) = self.tokens.clear() {
            warn!("Could not clear stored token: {}", e);
        }
        self.navigator.redirect(&self.urls.logout);
    }
}
