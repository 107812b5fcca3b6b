use {
    axum_login::tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer},
    time::Duration,
    tracing::debug,
};

use crate::util::{SameSiteConfig, SessionConfig};

impl From<&SameSiteConfig> for SameSite {
    fn from(policy: &SameSiteConfig) -> Self {
        match policy {
            SameSiteConfig::Strict => Self::Strict,
            SameSiteConfig::Lax => Self::Lax,
            SameSiteConfig::None => Self::None,
        }
    }
}

pub fn create_session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    debug!(?config, "Creating session layer");

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.secure)
        .with_same_site((&config.same_site_policy).into())
        .with_expiry(Expiry::OnInactivity(Duration::days(config.inactivity_days)));

    debug!("Session layer created");
    session_layer
}
