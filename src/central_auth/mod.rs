use std::collections::HashMap;

use {
    axum::{
        async_trait,
        extract::{FromRequestParts, Query},
        http::request::Parts,
        response::{IntoResponse, Response},
    },
    axum_login::tower_sessions::Session,
    typed_builder::TypedBuilder,
};

use crate::{model::User, Error};

pub mod client;

pub const CSRF_STATE_KEY: &str = "central_auth.csrf-state";
pub const PKCE_VERIFIER_KEY: &str = "central_auth.pkce-verifier";
pub const RETURN_TO_KEY: &str = "central_auth.return-to";
pub const ACCESS_TOKEN_KEY: &str = "central_auth.access-token";

/// The parts of an inbound request an auth client works with: the browser's session and the
/// query string.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub session: Session,
    pub params: HashMap<String, String>,
}

impl AuthRequest {
    pub const fn new(session: Session, params: HashMap<String, String>) -> Self {
        Self { session, params }
    }

    /// A query parameter, treating an empty value as absent.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        // An unreadable query string reaches the client as no parameters, so the route still
        // answers with its own error redirect.
        let params = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Query(params)| params)
            .unwrap_or_default();

        Ok(Self::new(session, params))
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct LoginOptions {
    /// Where the browser lands once the provider callback completes.
    #[builder(setter(into))]
    pub return_to: String,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct LogoutOptions {
    #[builder(setter(into))]
    pub return_to: String,
}

/// An authentication client bound to a single request.
///
/// Every operation consumes the client, so an instance can serve exactly one delegated call.
#[async_trait]
pub trait AuthClient: Send + Sized {
    /// Starts a login, usually by redirecting the browser to the provider.
    async fn login(self, request: AuthRequest, options: LoginOptions) -> Result<Response, Error>;

    /// Completes a login when the provider redirects back.
    async fn callback(self, request: AuthRequest) -> Result<Response, Error>;

    /// Responds with the current user's profile.
    async fn user(self, request: AuthRequest) -> Result<Response, Error>;

    /// Returns the current user's profile for the caller to render.
    async fn user_data(self, request: AuthRequest) -> Result<User, Error>;

    async fn logout(self, request: AuthRequest, options: LogoutOptions)
        -> Result<Response, Error>;
}

/// Produces a fresh [`AuthClient`] for each request.
pub trait AuthClientFactory: Send + Sync + 'static {
    type Client: AuthClient + 'static;

    /// # Errors
    ///
    /// Returns an error if the client cannot be configured.
    fn create(&self) -> Result<Self::Client, Error>;
}
