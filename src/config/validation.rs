use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound for any pool size or per-host limit
const MAX_POOL_SIZE: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates pool sizes, depth and the host allow-list
pub fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    validate_pool_size("downloaders", config.downloaders)?;
    validate_pool_size("extractors", config.extractors)?;
    validate_pool_size("per-host", config.per_host)?;

    if config.depth < 1 {
        return Err(ConfigError::Validation(format!(
            "depth must be >= 1, got {}",
            config.depth
        )));
    }

    if let Some(hosts) = &config.hosts {
        for host in hosts {
            validate_host(host)?;
        }
    }

    Ok(())
}

fn validate_pool_size(name: &str, value: usize) -> ConfigResult<()> {
    if !(1..=MAX_POOL_SIZE).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_POOL_SIZE, value
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates an allow-list entry: a bare host with no scheme, port or path
///
/// Case does not matter; entries are lowercased before matching.
fn validate_host(host: &str) -> ConfigResult<()> {
    if host.is_empty() {
        return Err(ConfigError::InvalidHost("Host cannot be empty".to_string()));
    }

    if host.contains("://") || host.contains('/') {
        return Err(ConfigError::InvalidHost(format!(
            "'{}' must be a bare host without scheme or path",
            host
        )));
    }

    if host.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidHost(format!(
            "'{}' contains whitespace",
            host
        )));
    }

    // Bracketed IPv6 literals are the only hosts allowed to contain ':'.
    let is_ipv6_literal = host.starts_with('[') && host.ends_with(']');
    if host.contains(':') && !is_ipv6_literal {
        return Err(ConfigError::InvalidHost(format!(
            "'{}' must not include a port",
            host
        )));
    }

    Ok(())
}
