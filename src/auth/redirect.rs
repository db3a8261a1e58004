//! Navigation to the identity provider.

use parking_lot::Mutex;

/// Receives full re-authentication redirects (login or logout pages).
pub trait Navigator: Send + Sync {
    fn redirect(&self, url: &str);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every URL redirected to, oldest first.
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visits.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, url: &str) {
        self.visits.lock().push(url.to_string());
    }
}

/// Login and logout endpoints of the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUrls {
    pub login: String,
    pub logout: String,
}

impl From<&crate::utils::toml_config::IdentityConfig> for IdentityUrls {
    fn from(config: &crate::utils::toml_config::IdentityConfig) -> Self {
        Self {
            login: config.login_url.clone(),
            logout: config.logout_url.clone(),
        }
    }
}
