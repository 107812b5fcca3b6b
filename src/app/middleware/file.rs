use std::path::Path;

use {
    tower_http::services::ServeDir,
    tracing::{debug, error},
};

use crate::{Config, Error};

pub fn create_file_service(config: &Config) -> Result<ServeDir, Error> {
    let web_root_path = Path::new(&config.web_root);
    if !web_root_path.is_dir() {
        error!(path = %web_root_path.display(), "Web root path does not exist.");
        return Err(Error::PathError(format!(
            "Web root path '{}' does not exist.",
            web_root_path.display()
        )));
    }

    debug!(web_root = %web_root_path.display(), "Serving static files");
    Ok(ServeDir::new(web_root_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_web_root_is_an_error() {
        let temp_dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        let config = Config {
            web_root: temp_dir.path().join("absent").display().to_string(),
            ..Config::default()
        };

        assert!(matches!(
            create_file_service(&config),
            Err(Error::PathError(_))
        ));
    }

    #[test]
    fn existing_web_root_is_served() {
        let temp_dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        let config = Config {
            web_root: temp_dir.path().display().to_string(),
            ..Config::default()
        };

        assert!(create_file_service(&config).is_ok());
    }
}
