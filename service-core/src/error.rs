use thiserror::Error;

/// Startup and infrastructure failures shared by the services.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_internal() {
        let err: AppError = std::io::Error::other("address in use").into();
        assert!(matches!(err, AppError::InternalError(_)));
        assert_eq!(err.to_string(), "Internal server error: address in use");
    }

    #[test]
    fn test_config_error_maps_to_config() {
        let err: AppError = config::ConfigError::NotFound("port".to_string()).into();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
