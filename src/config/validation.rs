use crate::config::types::{Config, CrawlerConfig, ExclusionConfig, OutputConfig};
use crate::ConfigError;

const MAX_CONCURRENCY: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_exclusion_config(&config.exclusion)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request-timeout must be at least 1 second".to_string(),
        ));
    }

    if config.max_duration == Some(0) {
        return Err(ConfigError::Validation(
            "max-duration must be at least 1 second when set".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.pages_path.is_empty() {
        return Err(ConfigError::Validation(
            "pages-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the exclusion policy table
fn validate_exclusion_config(config: &ExclusionConfig) -> Result<(), ConfigError> {
    for ext in &config.extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "Excluded extension '{}' must start with '.' and name a type",
                ext
            )));
        }
    }

    if config.markers.iter().any(|marker| marker.is_empty()) {
        return Err(ConfigError::Validation(
            "Exclusion markers cannot be empty strings".to_string(),
        ));
    }

    for segment in &config.segments {
        if segment.is_empty() || segment.contains('/') {
            return Err(ConfigError::Validation(format!(
                "Excluded segment '{}' must be a single non-empty path segment",
                segment
            )));
        }
    }

    Ok(())
}
