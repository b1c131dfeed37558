use crate::config::types::{Config, FetcherConfig, SourcesConfig, StorageConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on the inter-request delay (milliseconds)
const MAX_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    validate_sources_config(&config.sources)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> ConfigResult<()> {
    if config.delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "delay_ms must be <= {}ms, got {}ms",
            MAX_DELAY_MS, config.delay_ms
        )));
    }

    if config.fallback_user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fallback_user_agent cannot be empty".to_string(),
        ));
    }

    // Must be a valid header value
    if config
        .fallback_user_agent
        .chars()
        .any(|c| c.is_control() || !c.is_ascii())
    {
        return Err(ConfigError::Validation(format!(
            "fallback_user_agent must be printable ASCII, got '{}'",
            config.fallback_user_agent
        )));
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> ConfigResult<()> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    if config.content_extension.is_empty()
        || !config
            .content_extension
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "content_extension must be non-empty and alphanumeric, got '{}'",
            config.content_extension
        )));
    }

    Ok(())
}

fn validate_sources_config(config: &SourcesConfig) -> ConfigResult<()> {
    validate_source_url("wac_url", &config.wac_url)?;
    validate_source_url("rcw_url", &config.rcw_url)?;
    Ok(())
}

fn validate_source_url(field: &str, value: &str) -> ConfigResult<()> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url("wac_url", "https://app.leg.wa.gov/wac/default.aspx").is_ok());
        assert!(validate_source_url("wac_url", "http://127.0.0.1:8080/").is_ok());

        assert!(validate_source_url("wac_url", "").is_err());
        assert!(validate_source_url("wac_url", "not a url").is_err());
        assert!(validate_source_url("wac_url", "ftp://example.com/").is_err());
    }

    #[test]
    fn test_validate_extension() {
        let mut config = Config::default();
        config.storage.content_extension = "ht.ml".to_string();
        assert!(validate(&config).is_err());

        config.storage.content_extension = String::new();
        assert!(validate(&config).is_err());

        config.storage.content_extension = "htm".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_delay_bound() {
        let mut config = Config::default();
        config.fetcher.delay_ms = MAX_DELAY_MS + 1;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_fallback_user_agent() {
        let mut config = Config::default();
        config.fetcher.fallback_user_agent = "  ".to_string();
        assert!(validate(&config).is_err());

        config.fetcher.fallback_user_agent = "bad\nagent".to_string();
        assert!(validate(&config).is_err());
    }
}
