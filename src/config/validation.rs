use crate::config::types::{
    Config, CrawlerConfig, KyoboConfig, OutputConfig, UserAgentConfig, Yes24Config,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_yes24_config(&config.yes24)?;
    validate_kyobo_config(&config.kyobo)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent value cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_yes24_config(config: &Yes24Config) -> Result<(), ConfigError> {
    validate_base_url("yes24.base-url", &config.base_url)?;
    validate_page_size("yes24.search-page-size", config.search_page_size)?;
    Ok(())
}

fn validate_kyobo_config(config: &KyoboConfig) -> Result<(), ConfigError> {
    validate_base_url("kyobo.search-url", &config.search_url)?;
    validate_base_url("kyobo.product-url", &config.product_url)?;
    validate_page_size("kyobo.search-page-size", config.search_page_size)?;
    validate_page_size("kyobo.review-page-size", config.review_page_size)?;
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results_dir cannot be empty".to_string(),
        ));
    }

    if config.category_cache_path.is_empty() {
        return Err(ConfigError::Validation(
            "category_cache_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Site base URLs must be absolute http(s) URLs
fn validate_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            key, value
        )));
    }

    Ok(())
}

fn validate_page_size(key: &str, value: u32) -> Result<(), ConfigError> {
    if value < 1 {
        return Err(ConfigError::Validation(format!(
            "{} must be >= 1, got {}",
            key, value
        )));
    }
    Ok(())
}
