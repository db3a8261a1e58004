//! # pension-desk
//!
//! Client for a retirement case-management backend: retirement cases
//! (dossiers), the careers, payments and documents attached to them, and a
//! pension estimate derived from the careers. Authentication is delegated to
//! an external OAuth2/OIDC identity provider.
//!
//! ## Overview
//!
//! pension-desk can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `pension-desk` binary
//! 2. **As a library** - Drive the session, views and services from your own code
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use pension_desk::{AppContext, DeskConfig};
//! use pension_desk::views::ScopedList;
//!
//! #[tokio::main]
//! async fn main() -> pension_desk::Result<()> {
//!     let config = DeskConfig::load("pension-desk.toml")?;
//!     let mut ctx = AppContext::from_config(config, navigator)?;
//!
//!     if !ctx.start().await {
//!         return Ok(());
//!     }
//!
//!     let mut payments = ScopedList::new(ctx.services.payments.clone());
//!     payments.select(Some(7)).await;
//!     for payment in payments.rows() {
//!         println!("{} {}", payment.disbursement_date, payment.amount);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Gateway client and per-resource services
//! - [`auth`] - Session store, token storage, identity-provider redirects
//! - [`views`] - Scoped list, case selector and detail view state
//! - [`pension`] - Server-preferred pension estimation with local fallback
//! - [`assistant`] - Keyword-driven assistant
//! - [`cli`] - Terminal front-end
//! - [`types`] - Domain types and error handling
//!
//! ## Architecture
//!
//! There is no global state. One [`AppContext`] is built at process start
//! from [`DeskConfig`] and handed to every command. Every view re-fetches on
//! demand; nothing is cached.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// REST gateway client and domain services.
pub mod api;
/// Keyword-driven assistant over live case data.
pub mod assistant;
/// Session state and identity-provider integration.
pub mod auth;
/// Command-line front-end.
pub mod cli;
/// Pension estimation.
pub mod pension;
/// Domain types and errors.
pub mod types;
/// Configuration utilities.
pub mod utils;
/// View state for case screens.
pub mod views;

// Re-export commonly used types
pub use api::{ApiClient, Services};
pub use auth::{FileTokenStore, Navigator, SessionStore, SessionUser, TokenStore};
pub use pension::{PensionEstimate, PensionEstimator};
pub use types::{AppError, Result};
pub use utils::toml_config::DeskConfig;

use auth::IdentityUrls;
use std::sync::Arc;

/// Application-scoped context shared by every command.
pub struct AppContext {
    /// Configuration resolved at startup
    pub config: Arc<DeskConfig>,
    /// Gateway client shared by all services
    pub client: Arc<ApiClient>,
    /// Domain services
    pub services: Services,
    /// Authenticated-user state
    pub session: SessionStore,
    /// Bearer token storage
    pub tokens: Arc<dyn TokenStore>,
    /// Receiver of identity-provider redirects
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    /// Wire the client, services and session around the given token store
    /// and navigator.
    pub fn new(
        config: DeskConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Arc::new(ApiClient::from_config(
            &config,
            tokens.clone(),
            navigator.clone(),
        )?);
        let services = Services::new(client.clone());
        let session = SessionStore::new(
            services.auth.clone(),
            tokens.clone(),
            navigator.clone(),
            IdentityUrls::from(&config.identity),
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            services,
            session,
            tokens,
            navigator,
        })
    }

    /// Context with a file token store at the configured path.
    pub fn from_config(config: DeskConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.session.token_path.clone()));
        Self::new(config, tokens, navigator)
    }

    /// Run the authentication probe. Returns whether a user is signed in.
    pub async fn start(&mut self) -> bool {
        self.session.check_auth_status().await.is_some()
    }

    pub fn estimator(&self) -> PensionEstimator {
        PensionEstimator::new(self.services.cases.clone())
    }

    /// Tear down the session: backend logout, token removal, logout redirect.
    pub async fn shutdown(&mut self) {
        self.session.logout().await;
    }
}
