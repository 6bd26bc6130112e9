use crate::config::types::Config;
use crate::ConfigError;

/// Validates the entire configuration
///
/// Called once at startup; any error here aborts the process before the
/// crawl loop begins.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.top_n < 1 {
        return Err(ConfigError::Validation(format!(
            "top news count must be >= 1, got {}",
            config.top_n
        )));
    }

    if config.concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "simultaneous request limit must be >= 1, got {}",
            config.concurrency
        )));
    }

    if config.per_host_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "per-host request limit must be >= 1, got {}",
            config.per_host_limit
        )));
    }

    if config.timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request timeout must be positive".to_string(),
        ));
    }

    if config.restart_interval.is_zero() {
        return Err(ConfigError::Validation(
            "restart period must be positive".to_string(),
        ));
    }

    if config.base_url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base URL has no host: {}",
            config.base_url
        )));
    }

    if config.output_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = Config {
            top_n: 0,
            ..Config::default()
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_per_host_limit_rejected() {
        let config = Config {
            per_host_limit: 0,
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_restart_interval_rejected() {
        let config = Config {
            restart_interval: Duration::ZERO,
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_root_rejected() {
        let config = Config {
            output_root: PathBuf::new(),
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }
}
