//! Shared fixtures for the integration tests.
//!
//! Every test gets its own wiremock backend and an [`AppContext`] wired to it
//! with an in-memory token store and a recording navigator.

#![allow(dead_code)]

use pension_desk::auth::{MemoryTokenStore, RecordingNavigator, TokenStore};
use pension_desk::{AppContext, DeskConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const LOGIN_URL: &str = "http://idp.test/oauth2/authorization/keycloak";
pub const LOGOUT_URL: &str = "http://idp.test/logout";
pub const TOKEN: &str = "test-access-token";

/// A mock backend plus a context pointing at it.
pub struct TestDesk {
    pub server: MockServer,
    pub ctx: AppContext,
    pub tokens: Arc<MemoryTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
}

impl TestDesk {
    /// Signed-in context: a token is already stored.
    pub async fn start() -> Self {
        Self::with_tokens(MemoryTokenStore::with_token(TOKEN)).await
    }

    /// Context with no stored token.
    pub async fn anonymous() -> Self {
        Self::with_tokens(MemoryTokenStore::new()).await
    }

    async fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(tokens);
        let navigator = Arc::new(RecordingNavigator::new());

        let mut config = DeskConfig::default();
        config.api.base_url = format!("{}/api", server.uri());
        config.identity.login_url = LOGIN_URL.to_string();
        config.identity.logout_url = LOGOUT_URL.to_string();

        let ctx = AppContext::new(
            config,
            tokens.clone() as Arc<dyn TokenStore>,
            navigator.clone(),
        )
        .expect("context should build");

        Self {
            server,
            ctx,
            tokens,
            navigator,
        }
    }
}

pub fn case_json(id: i64, ssn: &str, last: &str, first: &str, status: &str) -> Value {
    json!({
        "id": id,
        "numeroSecuriteSociale": ssn,
        "statut": status,
        "dateCreation": "2024-02-01T09:30:00",
        "beneficiaire": {
            "id": id * 10,
            "nom": last,
            "prenom": first,
            "dateNaissance": "1961-05-12",
            "email": format!("{}@example.com", first.to_lowercase())
        }
    })
}

pub fn career_json(id: i64, case_id: i64, salary: f64, quarters: u32) -> Value {
    json!({
        "id": id,
        "entreprise": "Renault",
        "poste": "Technicien",
        "dateDebut": "1985-09-01",
        "dateFin": "2020-12-31",
        "salaireMoyen": salary,
        "regimeRetraite": "GENERAL",
        "trimestresValides": quarters,
        "dossierId": case_id
    })
}

pub fn payment_json(id: i64, case_id: i64, amount: f64, kind: &str) -> Value {
    json!({
        "id": id,
        "montant": amount,
        "dateVersement": "2024-03-31",
        "typePaiement": kind,
        "reference": format!("PAY-{}", id),
        "statut": "VALIDE",
        "dossierId": case_id
    })
}

pub fn document_json(id: i64, case_id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "nom": name,
        "type": "application/pdf",
        "dateUpload": "2024-04-02T10:15:00",
        "description": "Relevé de carrière",
        "tailleFichier": 2048,
        "dossierId": case_id
    })
}

pub fn dashboard_json() -> Value {
    json!({
        "totalDossiers": 10,
        "dossiersEnCours": 4,
        "dossiersValides": 5,
        "dossiersRejetes": 1,
        "totalCarrieres": 23,
        "salaireMoyen": 31250.5,
        "totalPaiements": 8,
        "montantTotalPaiements": 9600.0,
        "totalDocuments": 15
    })
}
