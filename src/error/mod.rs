use std::io;

use {
    axum_login::tower_sessions::session::Error as SessionError,
    oauth2::{basic::BasicRequestTokenError, reqwest::AsyncHttpClientError},
    thiserror::Error,
    url::ParseError,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Missing configuration value: {0}")]
    MissingConfig(&'static str),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("OAuth2 error: {0}")]
    OAuth2(#[from] BasicRequestTokenError<AsyncHttpClientError>),

    #[error("Cannot parse URL")]
    ParseError(#[from] ParseError),

    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),

    #[error("Missing CSRF state in the session")]
    MissingCSRFState,

    #[error("Invalid CSRF state")]
    InvalidCSRFState,

    #[error("Missing PKCE verifier in the session")]
    MissingPkceVerifier,

    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("No access token in the session")]
    NotAuthenticated,
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigError(Box::new(err))
    }
}
