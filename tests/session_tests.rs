//! Session store lifecycle against a mock `/auth/me`.

mod common;

use common::{TestDesk, LOGIN_URL, LOGOUT_URL, TOKEN};
use pension_desk::auth::{FileTokenStore, RecordingNavigator, TokenStore};
use pension_desk::{AppContext, DeskConfig};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn oidc_principal() -> serde_json::Value {
    json!({
        "sub": "5f1c2a",
        "name": "5f1c2a",
        "preferred_username": "agent.martin",
        "email": "agent.martin@caisse.example",
        "authorities": [
            {"authority": "ROLE_client_admin"},
            {"authority": "SCOPE_openid"},
            "ROLE_USER"
        ],
        "attributes": {"roles": ["client_admin", "offline_access"]}
    })
}

#[tokio::test]
async fn test_new_session_is_loading_and_anonymous() {
    let desk = TestDesk::start().await;
    assert!(desk.ctx.session.is_loading());
    assert!(!desk.ctx.session.is_authenticated());
}

#[tokio::test]
async fn test_probe_builds_user() {
    let mut desk = TestDesk::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oidc_principal()))
        .expect(1)
        .mount(&desk.server)
        .await;

    let user = desk
        .ctx
        .session
        .check_auth_status()
        .await
        .cloned()
        .expect("should be signed in");

    assert_eq!(user.username, "agent.martin");
    assert_eq!(user.email, "agent.martin@caisse.example");
    assert_eq!(
        user.roles,
        vec![
            "ROLE_client_admin",
            "SCOPE_openid",
            "ROLE_USER",
            "client_admin",
            "offline_access"
        ]
    );
    assert!(user.is_admin);
    assert!(user.is_user);
    assert!(desk.ctx.session.is_authenticated());
    assert!(!desk.ctx.session.is_loading());
}

#[tokio::test]
async fn test_unauthenticated_marker_means_no_user() {
    let mut desk = TestDesk::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authenticated": false})))
        .mount(&desk.server)
        .await;

    assert!(!desk.ctx.start().await);
    assert!(desk.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_probe_401_redirects_exactly_once() {
    let mut desk = TestDesk::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&desk.server)
        .await;

    assert!(!desk.ctx.start().await);
    assert_eq!(desk.navigator.visits(), vec![LOGIN_URL.to_string()]);
}

#[tokio::test]
async fn test_probe_403_redirects_to_login() {
    let mut desk = TestDesk::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&desk.server)
        .await;

    assert!(!desk.ctx.start().await);
    assert_eq!(desk.navigator.last().as_deref(), Some(LOGIN_URL));
}

#[tokio::test]
async fn test_probe_server_error_does_not_redirect() {
    let mut desk = TestDesk::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&desk.server)
        .await;

    assert!(!desk.ctx.start().await);
    assert!(desk.navigator.visits().is_empty());
    assert!(!desk.ctx.session.is_loading());
}

#[tokio::test]
async fn test_logout_swallows_backend_error() {
    let mut desk = TestDesk::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oidc_principal()))
        .mount(&desk.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&desk.server)
        .await;

    assert!(desk.ctx.start().await);
    desk.ctx.shutdown().await;

    assert!(!desk.ctx.session.is_authenticated());
    assert!(desk.tokens.load().is_none());
    assert_eq!(desk.navigator.last().as_deref(), Some(LOGOUT_URL));
}

#[tokio::test]
async fn test_store_token_rejects_blank() {
    let desk = TestDesk::anonymous().await;
    assert!(desk.ctx.session.store_token("   ").is_err());
    assert!(desk.tokens.load().is_none());

    desk.ctx.session.store_token(&format!("  {}\n", TOKEN)).expect("store");
    assert_eq!(desk.tokens.load().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_file_token_survives_between_contexts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("tempdir");

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oidc_principal()))
        .mount(&server)
        .await;

    let mut config = DeskConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    config.session.token_path = dir.path().join("nested").join("token");

    {
        let ctx = AppContext::from_config(config.clone(), Arc::new(RecordingNavigator::new()))
            .expect("context");
        ctx.session.store_token(TOKEN).expect("store");
    }

    let stored = FileTokenStore::new(config.session.token_path.clone());
    assert_eq!(stored.load().as_deref(), Some(TOKEN));

    let mut ctx =
        AppContext::from_config(config, Arc::new(RecordingNavigator::new())).expect("context");
    assert!(ctx.start().await);

    let requests = server.received_requests().await.expect("recording on");
    let auth = requests[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(auth, Some(format!("Bearer {}", TOKEN)));
}
