use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::query::Query;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_query(&config.query)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.enrich_concurrency == 0 {
        return Err(ConfigError::Validation(
            "enrich_concurrency must be >= 1 (1 = sequential)".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Ok(())
}

fn validate_query(query: &Query) -> Result<(), ConfigError> {
    let url = Url::parse(&query.root_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root_url '{}': {}", query.root_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "root_url '{}' must use http or https",
            query.root_url
        )));
    }

    Ok(())
}
