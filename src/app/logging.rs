use {
    tracing::Level,
    tracing_subscriber::{
        filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
    },
};

use crate::util::LoggerConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the configured verbosity.
pub fn init_tracing(config: &LoggerConfig) {
    let level: Level = config.verbosity.into();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
    {
        eprintln!("Tracing subscriber already installed: {err}");
    }
}
