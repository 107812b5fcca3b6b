use std::sync::Arc;

use {
    axum::Router,
    tower_http::{services::ServeDir, trace::TraceLayer},
    tracing::{debug, error, info},
};

use crate::{
    central_auth::{client::CentralAuthFactory, AuthClientFactory},
    web::{router::home, Gateway},
    Config, Error,
};

use super::{
    middleware::{file::create_file_service, session::create_session_layer},
    Server,
};

type RouterFactory = dyn FnOnce(&Arc<Config>) -> Router + Send + 'static;

type FallbackServiceFactory = dyn FnOnce(&Arc<Config>) -> Result<ServeDir, Error> + Send + 'static;

pub struct Builder<F>
where
    F: AuthClientFactory,
{
    config: Arc<Config>,
    client_factory: F,
    extra_router_factory: Option<Box<RouterFactory>>,
    fallback_service_factory: Option<Box<FallbackServiceFactory>>,
}

impl Builder<CentralAuthFactory> {
    /// A builder whose auth routes are served by [`CentralAuthClient`](crate::central_auth::client::CentralAuthClient).
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let factory = CentralAuthFactory::new(config.clone());
        Self::with_client_factory(config, factory)
    }
}

impl<F> Builder<F>
where
    F: AuthClientFactory,
{
    pub fn with_client_factory(config: Arc<Config>, client_factory: F) -> Self {
        debug!(?config, "Initializing Builder");

        Self {
            config,
            client_factory,
            extra_router_factory: None,
            fallback_service_factory: None,
        }
    }

    /// Merges additional routes next to the home page and the auth routes.
    #[must_use]
    pub fn with_router<R>(mut self, factory: R) -> Self
    where
        R: FnOnce(&Arc<Config>) -> Router + Send + 'static,
    {
        self.extra_router_factory = Some(Box::new(factory));
        self
    }

    #[must_use]
    pub fn with_fallback_service<S>(mut self, factory: S) -> Self
    where
        S: FnOnce(&Arc<Config>) -> Result<ServeDir, Error> + Send + 'static,
    {
        self.fallback_service_factory = Some(Box::new(factory));
        self
    }

    /// Build the server. Static files are served from the configured web root if no fallback
    /// service was provided.
    ///
    /// # Errors
    ///
    /// This function will return an error if a provided fallback service factory fails.
    pub fn build(self) -> Result<Server, Error> {
        let config = self.config;
        let routes = config.routes.with_root();

        let gateway = Gateway::new(self.client_factory, config.clone());

        let mut router = home::router(&routes).merge(gateway.router());

        if let Some(factory) = self.extra_router_factory {
            router = router.merge(factory(&config));
        }

        let file_service = if let Some(factory) = self.fallback_service_factory {
            factory(&config)?
        } else {
            create_file_service(&config).unwrap_or_else(|e| {
                error!("Failed to build file service: {:?}", e);
                ServeDir::new(&config.web_root)
            })
        };

        let router = router
            .fallback_service(file_service)
            .layer(create_session_layer(&config.session))
            .layer(TraceLayer::new_for_http());

        info!("App successfully initialized");

        Ok(Server { router, config })
    }
}
