use std::sync::Arc;

use {
    axum::{
        response::{IntoResponse, Redirect, Response},
        routing::get,
        Router,
    },
    tracing::{error, info},
};

use crate::{
    central_auth::{AuthClient, AuthClientFactory, AuthRequest, LoginOptions, LogoutOptions},
    model::User,
    util::Routes,
    web::{error_code::ErrorCode, router::profile::ProfileFlash},
    Config, Error,
};

/// Hands each auth route to a freshly created [`AuthClient`] and turns any failure into a
/// redirect home carrying an [`ErrorCode`].
pub struct Gateway<F>
where
    F: AuthClientFactory,
{
    factory: F,
    config: Arc<Config>,
    routes: Routes,
}

impl<F> Gateway<F>
where
    F: AuthClientFactory,
{
    pub fn new(factory: F, config: Arc<Config>) -> Self {
        let routes = config.routes.with_root();
        Self {
            factory,
            config,
            routes,
        }
    }

    fn error_redirect(&self, code: ErrorCode) -> Response {
        Redirect::to(&format!("{}?error={code}", self.routes.home)).into_response()
    }

    fn respond(&self, result: Result<Response, Error>, code: ErrorCode) -> Response {
        result.unwrap_or_else(|err| {
            error!(error = %err, %code, "Auth operation failed");
            self.error_redirect(code)
        })
    }

    async fn try_login(&self, request: AuthRequest) -> Result<Response, Error> {
        let return_to = self.config.public_url(&self.routes.profile)?;
        let options = LoginOptions::builder().return_to(return_to).build();
        self.factory.create()?.login(request, options).await
    }

    async fn try_callback(&self, request: AuthRequest) -> Result<Response, Error> {
        self.factory.create()?.callback(request).await
    }

    async fn try_user(&self, request: AuthRequest) -> Result<Response, Error> {
        self.factory.create()?.user(request).await
    }

    async fn try_logout(&self, request: AuthRequest) -> Result<Response, Error> {
        let options = LogoutOptions::builder()
            .return_to(self.config.base_url.as_str())
            .build();
        self.factory.create()?.logout(request, options).await
    }

    async fn try_user_data(&self, request: AuthRequest) -> Result<User, Error> {
        self.factory.create()?.user_data(request).await
    }

    pub async fn login(&self, request: AuthRequest) -> Response {
        let result = self.try_login(request).await;
        self.respond(result, ErrorCode::LoginFailed)
    }

    pub async fn callback(&self, request: AuthRequest) -> Response {
        let result = self.try_callback(request).await;
        self.respond(result, ErrorCode::CallbackFailed)
    }

    pub async fn user(&self, request: AuthRequest) -> Response {
        let result = self.try_user(request).await;
        self.respond(result, ErrorCode::UserInfoFailed)
    }

    pub async fn logout(&self, request: AuthRequest) -> Response {
        let result = self.try_logout(request).await;
        self.respond(result, ErrorCode::LogoutFailed)
    }

    pub async fn profile(&self, request: AuthRequest) -> Response {
        let flash = ProfileFlash::from_request(&request);

        match self.try_user_data(request).await {
            Ok(user) => flash.render(user, self.routes.clone()),
            Err(err) => {
                info!(error = %err, "Could not fetch fresh user data");
                self.error_redirect(ErrorCode::NotLoggedIn)
            }
        }
    }

    pub fn router(self) -> Router {
        let routes = self.routes.clone();
        let this = Arc::new(self);

        Router::new()
            .route(
                &routes.login,
                get({
                    let this = this.clone();
                    move |request: AuthRequest| {
                        let this = this.clone();
                        async move { this.login(request).await }
                    }
                }),
            )
            .route(
                &routes.callback,
                get({
                    let this = this.clone();
                    move |request: AuthRequest| {
                        let this = this.clone();
                        async move { this.callback(request).await }
                    }
                }),
            )
            .route(
                &routes.user,
                get({
                    let this = this.clone();
                    move |request: AuthRequest| {
                        let this = this.clone();
                        async move { this.user(request).await }
                    }
                }),
            )
            .route(
                &routes.logout,
                get({
                    let this = this.clone();
                    move |request: AuthRequest| {
                        let this = this.clone();
                        async move { this.logout(request).await }
                    }
                }),
            )
            .route(
                &routes.profile,
                get({
                    move |request: AuthRequest| {
                        let this = this.clone();
                        async move { this.profile(request).await }
                    }
                }),
            )
    }
}
