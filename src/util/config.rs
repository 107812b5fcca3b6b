#![allow(clippy::module_name_repetitions)]

use std::path::Path;

use {
    derivative::Derivative,
    figment::{
        providers::{Format, Toml},
        Figment,
    },
    oauth2::{ClientId, ClientSecret},
    serde::{Deserialize, Serialize},
    strum::{Display, EnumString, VariantNames},
    tracing::Level,
    url::Url,
};

use crate::Error;

pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variables read on top of the config files, and the setting each one overrides.
pub const ENV_BASE_URL: &str = "BASE_URL";
pub const ENV_ORGANIZATION_ID: &str = "AUTH_ORGANIZATION_ID";
pub const ENV_SECRET: &str = "AUTH_SECRET";
pub const ENV_AUTH_BASE_URL: &str = "AUTH_BASE_URL";

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct CentralAuthConfig {
    /// The client identifier issued by CentralAuth.
    pub organization_id: Option<ClientId>,
    pub secret: Option<ClientSecret>,
    /// Base url of the CentralAuth provider, the endpoint paths below are joined onto it.
    pub auth_base_url: Option<String>,
    #[derivative(Default(value = "true"))]
    pub debug: bool,
    #[derivative(Default(value = "\"login\".into()"))]
    pub login_path: String,
    #[derivative(Default(value = "\"api/v1/verify\".into()"))]
    pub token_path: String,
    #[derivative(Default(value = "\"api/v1/userinfo\".into()"))]
    pub userinfo_path: String,
    #[derivative(Default(value = "\"api/v1/logout\".into()"))]
    pub logout_path: String,
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct SessionConfig {
    pub same_site_policy: SameSiteConfig,
    #[derivative(Default(value = "false"))]
    pub secure: bool,
    #[derivative(Default(value = "1"))]
    pub inactivity_days: i64,
}

#[derive(
    Default, Display, EnumString, VariantNames, Debug, Serialize, Deserialize, Clone, PartialEq, Eq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SameSiteConfig {
    Strict,
    #[default]
    Lax,
    None,
}

#[derive(
    Default,
    Display,
    EnumString,
    VariantNames,
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
pub enum Verbosity {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<Verbosity> for Level {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Trace => Self::TRACE,
            Verbosity::Debug => Self::DEBUG,
            Verbosity::Info => Self::INFO,
            Verbosity::Warn => Self::WARN,
            Verbosity::Error => Self::ERROR,
        }
    }
}

#[derive(Default, Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggerConfig {
    pub verbosity: Verbosity,
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct Routes {
    #[derivative(Default(value = "\"/\".into()"))]
    pub root: String,
    #[derivative(Default(value = "String::new()"))]
    pub home: String,
    #[derivative(Default(value = "\"api/auth/login\".into()"))]
    pub login: String,
    #[derivative(Default(value = "\"api/auth/callback\".into()"))]
    pub callback: String,
    #[derivative(Default(value = "\"api/auth/user\".into()"))]
    pub user: String,
    #[derivative(Default(value = "\"api/auth/logout\".into()"))]
    pub logout: String,
    #[derivative(Default(value = "\"profile\".into()"))]
    pub profile: String,
}

impl Routes {
    /// Returns a new `Routes` struct with the `root` path prepended to all paths.
    pub fn with_root(&self) -> Self {
        let normalized_base = normalize_slash(&self.root);
        Self {
            root: normalized_base.clone(),
            home: join_paths(&normalized_base, &self.home),
            login: join_paths(&normalized_base, &self.login),
            callback: join_paths(&normalized_base, &self.callback),
            user: join_paths(&normalized_base, &self.user),
            logout: join_paths(&normalized_base, &self.logout),
            profile: join_paths(&normalized_base, &self.profile),
        }
    }
}

fn normalize_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

fn join_paths(base: &str, path: &str) -> String {
    let trimmed_base = base.trim_end_matches('/');
    let trimmed_path = path.trim_start_matches('/');
    format!("{trimmed_base}/{trimmed_path}")
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    #[derivative(Default(value = "\"http://localhost:3000\".into()"))]
    pub base_url: String,
    pub auth: CentralAuthConfig,
    pub routes: Routes,
    pub session: SessionConfig,
    pub logger: LoggerConfig,
    #[derivative(Default(value = "\"public\".into()"))]
    pub web_root: String,
}

impl Config {
    /// Loads `default.toml` then `local.toml` from `dir` (both optional) and applies the
    /// process environment on top.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let mut config = Self::load_files(dir)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_files(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let config: Self = Figment::new()
            .merge(Toml::file(dir.join("default.toml")))
            .merge(Toml::file(dir.join("local.toml")))
            .extract()?;
        Ok(config)
    }

    /// Overrides settings with the environment variables that are set. Empty values count as unset.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| var(name).filter(|value| !value.is_empty());

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(organization_id) = lookup(ENV_ORGANIZATION_ID) {
            self.auth.organization_id = Some(ClientId::new(organization_id));
        }
        if let Some(secret) = lookup(ENV_SECRET) {
            self.auth.secret = Some(ClientSecret::new(secret));
        }
        if let Some(auth_base_url) = lookup(ENV_AUTH_BASE_URL) {
            self.auth.auth_base_url = Some(auth_base_url);
        }
    }

    /// The public url for a path on this server, e.g. the callback url handed to the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid url.
    pub fn public_url(&self, path: &str) -> Result<Url, Error> {
        let base = Url::parse(&normalize_slash(&self.base_url))?;
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// The port to listen on, taken from `base_url` and falling back to 3000.
    pub fn port(&self) -> u16 {
        Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.port())
            .unwrap_or(3000)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_base_prepend_with_and_without_trailing_slash() {
        let routes_with_slash = Routes {
            root: "/app/".to_string(),
            home: "home".to_string(),
            login: "login".to_string(),
            callback: "callback".to_string(),
            user: "user".to_string(),
            logout: "logout".to_string(),
            profile: "profile".to_string(),
        };

        let updated = routes_with_slash.with_root();
        assert_eq!(updated.home, "/app/home");
        assert_eq!(updated.login, "/app/login");
        assert_eq!(updated.callback, "/app/callback");
        assert_eq!(updated.logout, "/app/logout");
        assert_eq!(updated.profile, "/app/profile");

        let routes_without_slash = Routes {
            root: "/app".to_string(),
            ..routes_with_slash
        };

        let updated = routes_without_slash.with_root();
        assert_eq!(updated.root, "/app/");
        assert_eq!(updated.user, "/app/user");
        assert_eq!(updated.profile, "/app/profile");
    }

    #[test]
    fn test_default_routes() {
        let routes = Routes::default().with_root();
        assert_eq!(routes.home, "/");
        assert_eq!(routes.login, "/api/auth/login");
        assert_eq!(routes.callback, "/api/auth/callback");
        assert_eq!(routes.user, "/api/auth/user");
        assert_eq!(routes.logout, "/api/auth/logout");
        assert_eq!(routes.profile, "/profile");
    }

    #[test]
    fn test_normalize_slash() {
        assert_eq!(normalize_slash("path"), "path/");
        assert_eq!(normalize_slash("path/"), "path/");
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/root", "/path"), "/root/path");
        assert_eq!(join_paths("/root/", "path"), "/root/path");
        assert_eq!(join_paths("/root/", "//path"), "/root/path");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.auth.debug);
        assert!(config.auth.organization_id.is_none());
        assert_eq!(config.auth.token_path, "api/v1/verify");
        assert_eq!(config.web_root, "public");
        assert_eq!(config.port(), 3000);
    }

    #[test]
    fn test_apply_env_overrides_set_values_only() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://demo.example.com:8443"),
            (ENV_ORGANIZATION_ID, "org-123"),
            (ENV_SECRET, ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|name| env.get(name).map(ToString::to_string));

        assert_eq!(config.base_url, "https://demo.example.com:8443");
        assert_eq!(config.port(), 8443);
        assert_eq!(
            config.auth.organization_id,
            Some(ClientId::new("org-123".to_string()))
        );
        assert!(config.auth.secret.is_none());
        assert!(config.auth.auth_base_url.is_none());
    }

    #[test]
    fn test_public_url() {
        let config = Config {
            base_url: "http://localhost:3000".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.public_url("/api/auth/callback").unwrap().as_str(),
            "http://localhost:3000/api/auth/callback"
        );

        let nested = Config {
            base_url: "https://example.com/demo".to_string(),
            ..Config::default()
        };
        assert_eq!(
            nested.public_url("profile").unwrap().as_str(),
            "https://example.com/demo/profile"
        );
    }

    #[test]
    fn test_port_without_explicit_port_falls_back() {
        let config = Config {
            base_url: "https://example.com".to_string(),
            ..Config::default()
        };
        assert_eq!(config.port(), 3000);
    }

    #[test]
    fn test_config_load_with_local_override() {
        let default_toml_content = r#"
            base_url = "http://localhost:8080"

            [auth]
            organization_id = "default-org"
            auth_base_url = "https://auth.example.com"

            [session]
            same_site_policy = "strict"

            [logger]
            verbosity = "Info"
        "#;

        let local_toml_content = r#"
            [auth]
            secret = "local-secret"
            debug = false

            [logger]
            verbosity = "Debug"
        "#;

        let temp_dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        let config_dir = temp_dir.path();

        std::fs::write(config_dir.join("default.toml"), default_toml_content)
            .expect("Failed to write to temp default.toml file");
        std::fs::write(config_dir.join("local.toml"), local_toml_content)
            .expect("Failed to write to temp local.toml file");

        let config = Config::load_files(config_dir).expect("Failed to load config");

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.port(), 8080);
        assert_eq!(
            config.auth.organization_id,
            Some(ClientId::new("default-org".to_string()))
        );
        assert_eq!(
            config.auth.secret.as_ref().map(ClientSecret::secret),
            Some(&"local-secret".to_string())
        );
        assert!(!config.auth.debug);
        assert_eq!(config.session.same_site_policy, SameSiteConfig::Strict);
        assert_eq!(config.logger.verbosity, Verbosity::Debug);
        assert_eq!(config.routes.with_root().login, "/api/auth/login");
    }

    #[test]
    fn test_missing_config_dir_gives_defaults() {
        let temp_dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        let config = Config::load_files(temp_dir.path().join("absent")).expect("defaults");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        std::fs::write(temp_dir.path().join("default.toml"), "base_url = [")
            .expect("Failed to write to temp default.toml file");

        let result = Config::load_files(temp_dir.path());
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
