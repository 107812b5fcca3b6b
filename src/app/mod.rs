mod builder;
mod logging;
mod middleware;
mod server;

pub use {builder::Builder, logging::init_tracing, server::Server};
