mod config;

pub use config::{
    CentralAuthConfig, Config, LoggerConfig, Routes, SameSiteConfig, SessionConfig, Verbosity,
    DEFAULT_CONFIG_DIR, ENV_AUTH_BASE_URL, ENV_ORGANIZATION_ID, ENV_SECRET,
};
