use grafton_auth_gateway::{init_tracing, Builder, Config, Error, DEFAULT_CONFIG_DIR};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load_from_dir(DEFAULT_CONFIG_DIR)?;
    init_tracing(&config.logger);

    Builder::new(config).build()?.start().await
}
