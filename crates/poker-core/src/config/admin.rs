//! Admin dashboard access configuration.

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no secret is configured.
pub const ADMIN_SECRET_ENV: &str = "POKER_ADMIN_SECRET";

/// Shared-secret admin access.
///
/// With no secret configured every admin authentication attempt fails.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The shared admin password.
    #[serde(default)]
    pub secret: Option<String>,
}

impl AdminConfig {
    /// Returns the configured secret, treating an empty string as unset.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("secret", &self.secret().map(|_| "<redacted>"))
            .finish()
    }
}
