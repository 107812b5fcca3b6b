use std::sync::Arc;

use {
    axum::{
        async_trait,
        response::{IntoResponse, Json, Redirect, Response},
    },
    axum_login::tower_sessions::Session,
    oauth2::{
        basic::BasicClient, reqwest::async_http_client, AuthUrl, AuthorizationCode, CsrfToken,
        PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, TokenResponse, TokenUrl,
    },
    reqwest::header::{HeaderValue, USER_AGENT},
    tracing::debug,
    url::Url,
};

use crate::{
    model::User,
    util::{ENV_AUTH_BASE_URL, ENV_ORGANIZATION_ID, ENV_SECRET},
    Config, Error,
};

use super::{
    AuthClient, AuthClientFactory, AuthRequest, LoginOptions, LogoutOptions, ACCESS_TOKEN_KEY,
    CSRF_STATE_KEY, PKCE_VERIFIER_KEY, RETURN_TO_KEY,
};

const USER_AGENT_VALUE: &str = "grafton-auth-gateway";

/// Talks to a CentralAuth provider using the OAuth2 authorization code flow with PKCE.
///
/// Login state and the access token live in the browser's session, so the client itself holds
/// nothing but configuration.
#[derive(Debug)]
pub struct CentralAuthClient {
    oauth: BasicClient,
    http: reqwest::Client,
    userinfo_url: Url,
    logout_url: Url,
    base_url: Url,
    debug: bool,
}

impl CentralAuthClient {
    /// # Errors
    ///
    /// Returns an error if the organization id, secret or provider url is missing, or if any of
    /// the configured urls does not parse.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let auth = &config.auth;

        let client_id = auth
            .organization_id
            .clone()
            .ok_or(Error::MissingConfig(ENV_ORGANIZATION_ID))?;
        let client_secret = auth
            .secret
            .clone()
            .ok_or(Error::MissingConfig(ENV_SECRET))?;
        let provider = auth
            .auth_base_url
            .as_deref()
            .ok_or(Error::MissingConfig(ENV_AUTH_BASE_URL))?;
        let provider = Url::parse(&format!("{}/", provider.trim_end_matches('/')))?;

        let auth_url = AuthUrl::from_url(provider.join(&auth.login_path)?);
        let token_url = TokenUrl::from_url(provider.join(&auth.token_path)?);
        let redirect_url = RedirectUrl::from_url(
            config.public_url(&config.routes.with_root().callback)?,
        );

        let oauth = BasicClient::new(client_id, Some(client_secret), auth_url, Some(token_url))
            .set_redirect_uri(redirect_url);

        Ok(Self {
            oauth,
            http: reqwest::Client::new(),
            userinfo_url: provider.join(&auth.userinfo_path)?,
            logout_url: provider.join(&auth.logout_path)?,
            base_url: config.public_url("/")?,
            debug: auth.debug,
        })
    }

    async fn fetch_user(&self, session: &Session) -> Result<User, Error> {
        let access_token: String = session
            .get(ACCESS_TOKEN_KEY)
            .await?
            .ok_or(Error::NotAuthenticated)?;

        let user = self
            .http
            .get(self.userinfo_url.clone())
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<User>()
            .await?;

        if self.debug {
            debug!(email = %user.email, "Fetched user info from CentralAuth");
        }

        Ok(user)
    }
}

#[async_trait]
impl AuthClient for CentralAuthClient {
    async fn login(self, request: AuthRequest, options: LoginOptions) -> Result<Response, Error> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (url, csrf_token) = self
            .oauth
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge)
            .add_extra_param("return_to", options.return_to.clone())
            .url();

        let session = &request.session;
        session.insert(CSRF_STATE_KEY, csrf_token.secret()).await?;
        session
            .insert(PKCE_VERIFIER_KEY, pkce_verifier.secret())
            .await?;
        session.insert(RETURN_TO_KEY, &options.return_to).await?;

        if self.debug {
            debug!(%url, return_to = %options.return_to, "Redirecting to CentralAuth login");
        }

        Ok(Redirect::to(url.as_str()).into_response())
    }

    async fn callback(self, request: AuthRequest) -> Result<Response, Error> {
        let code = request
            .param("code")
            .ok_or(Error::MissingParameter("code"))?;
        let state = request
            .param("state")
            .ok_or(Error::MissingParameter("state"))?;

        let session = &request.session;

        let stored_state: String = session
            .remove(CSRF_STATE_KEY)
            .await?
            .ok_or(Error::MissingCSRFState)?;
        if stored_state != state {
            return Err(Error::InvalidCSRFState);
        }

        let pkce_verifier: String = session
            .remove(PKCE_VERIFIER_KEY)
            .await?
            .ok_or(Error::MissingPkceVerifier)?;

        let token = self
            .oauth
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(async_http_client)
            .await?;

        session
            .insert(ACCESS_TOKEN_KEY, token.access_token().secret())
            .await?;

        let return_to = session
            .remove::<String>(RETURN_TO_KEY)
            .await?
            .unwrap_or_else(|| self.base_url.to_string());

        if self.debug {
            debug!(%return_to, "CentralAuth callback completed");
        }

        Ok(Redirect::to(&return_to).into_response())
    }

    async fn user(self, request: AuthRequest) -> Result<Response, Error> {
        let user = self.fetch_user(&request.session).await?;
        Ok(Json(user).into_response())
    }

    async fn user_data(self, request: AuthRequest) -> Result<User, Error> {
        self.fetch_user(&request.session).await
    }

    async fn logout(
        self,
        request: AuthRequest,
        options: LogoutOptions,
    ) -> Result<Response, Error> {
        let session = &request.session;

        // The local session ends even when the provider cannot be told.
        let access_token = session.get::<String>(ACCESS_TOKEN_KEY).await?;
        session.flush().await?;

        if let Some(access_token) = access_token {
            self.http
                .get(self.logout_url.clone())
                .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
                .bearer_auth(access_token)
                .send()
                .await?
                .error_for_status()?;

            if self.debug {
                debug!("Provider session ended");
            }
        }

        Ok(Redirect::to(&options.return_to).into_response())
    }
}

/// Builds a [`CentralAuthClient`] from the process configuration for every request.
#[derive(Debug, Clone)]
pub struct CentralAuthFactory {
    config: Arc<Config>,
}

impl CentralAuthFactory {
    pub const fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl AuthClientFactory for CentralAuthFactory {
    type Client = CentralAuthClient;

    fn create(&self) -> Result<Self::Client, Error> {
        CentralAuthClient::new(&self.config)
    }
}
