#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod app;
pub mod central_auth;
mod error;
pub mod model;
mod util;
pub mod web;

pub use {
    app::{init_tracing, Builder, Server},
    error::Error,
    util::{
        CentralAuthConfig, Config, LoggerConfig, Routes, SameSiteConfig, SessionConfig, Verbosity,
        DEFAULT_CONFIG_DIR,
    },
};
