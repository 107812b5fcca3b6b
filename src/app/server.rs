use std::{net::SocketAddr, sync::Arc};

use {
    axum::Router,
    tokio::{net::TcpListener, signal},
    tracing::{error, info},
};

use crate::{Config, Error};

pub struct Server {
    pub router: Router,
    pub config: Arc<Config>,
}

impl Server {
    /// Binds the port taken from the base url and serves until Ctrl-C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails while running.
    pub async fn start(self) -> Result<(), Error> {
        let address = SocketAddr::from(([0, 0, 0, 0], self.config.port()));
        let listener = TcpListener::bind(address).await?;

        info!(
            base_url = %self.config.base_url,
            address = %listener.local_addr()?,
            "Server running"
        );
        log_auth_settings(&self.config);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

fn mark(present: bool) -> &'static str {
    if present {
        "set"
    } else {
        "not set"
    }
}

fn log_auth_settings(config: &Config) {
    let auth = &config.auth;
    info!(
        organization_id = mark(auth.organization_id.is_some()),
        secret = mark(auth.secret.is_some()),
        auth_base_url = auth.auth_base_url.as_deref().unwrap_or("not set"),
        base_url = %config.base_url,
        "Auth settings loaded"
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(%err, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => error!(%err, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
