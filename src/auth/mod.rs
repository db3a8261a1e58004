//! Session and Identity-Provider Integration
//!
//! Authentication itself happens at an external OAuth2/OIDC provider. This
//! module only stores and forwards the bearer token, probes the backend for
//! the current user and sends the user to the provider's login and logout
//! pages.
//!
//! # Module Structure
//!
//! - [`auth::session`](crate::auth::session) - Session store and role extraction
//! - [`auth::token_store`](crate::auth::token_store) - Bearer token persistence
//! - [`auth::redirect`](crate::auth::redirect) - Navigation to the identity provider
//!
//! # Configuration
//!
//! Configure via `pension-desk.toml`:
//! ```toml
//! [identity]
//! login_url = "http://localhost:8088/oauth2/authorization/keycloak"
//! logout_url = "http://localhost:8088/logout"
//!
//! [session]
//! token_path = ".pension-desk/token"
//! ```

/// Login and logout redirects.
pub mod redirect;
/// Session store built from the current-user probe.
pub mod session;
/// File and in-memory token stores.
pub mod token_store;

pub use redirect::{IdentityUrls, Navigator, RecordingNavigator};
pub use session::{SessionStore, SessionUser};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
