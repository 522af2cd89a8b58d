use crate::config::budget::CrawlBudget;
use crate::config::types::{CrawlerConfig, OutputConfig, ParsingConfig, ScrapingConfig, Settings};
use crate::ConfigError;
use scraper::Selector;

/// Accepted range for the crawl depth
pub const DEPTH_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Accepted range for the page budget
pub const MAX_PAGES_RANGE: std::ops::RangeInclusive<usize> = 1..=1000;

/// Accepted range for per-batch concurrency
pub const CONCURRENCY_RANGE: std::ops::RangeInclusive<usize> = 1..=100;

/// Validates the entire settings file
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_scraping_config(&settings.scraping)?;
    validate_crawler_config(&settings.crawler)?;
    validate_parsing_config(&settings.parsing)?;
    validate_output_config(&settings.output)?;
    Ok(())
}

/// Validates a fully assembled crawl budget
pub fn validate_budget(budget: &CrawlBudget) -> Result<(), ConfigError> {
    if !DEPTH_RANGE.contains(&budget.max_depth) {
        return Err(ConfigError::Validation(format!(
            "max depth must be between 1 and 10, got {}",
            budget.max_depth
        )));
    }

    if !MAX_PAGES_RANGE.contains(&budget.max_pages) {
        return Err(ConfigError::Validation(format!(
            "max pages must be between 1 and 1000, got {}",
            budget.max_pages
        )));
    }

    validate_concurrency(budget.concurrency)?;
    validate_user_agent(&budget.user_agent)?;

    if budget.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request timeout must be greater than zero".to_string(),
        ));
    }

    validate_growth_factor(budget.queue_growth_factor)?;
    validate_selectors(&budget.noise_selectors)?;

    Ok(())
}

/// Validates scraping configuration
fn validate_scraping_config(config: &ScrapingConfig) -> Result<(), ConfigError> {
    validate_user_agent(&config.user_agent)?;

    if config.timeout == 0 {
        return Err(ConfigError::Validation(
            "timeout must be >= 1 second, got 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !config.delay.is_finite() || config.delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay
        )));
    }

    validate_concurrency(config.concurrent)?;
    validate_growth_factor(config.queue_growth_factor)?;

    Ok(())
}

/// Validates parsing configuration
fn validate_parsing_config(config: &ParsingConfig) -> Result<(), ConfigError> {
    validate_selectors(&config.remove_elements)
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.filename_template.trim().is_empty() {
        return Err(ConfigError::Validation(
            "filename_template cannot be empty".to_string(),
        ));
    }

    if config.max_file_size_mb == 0 {
        return Err(ConfigError::Validation(
            "max_file_size_mb must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if !CONCURRENCY_RANGE.contains(&concurrency) {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            concurrency
        )));
    }
    Ok(())
}

fn validate_growth_factor(factor: usize) -> Result<(), ConfigError> {
    if factor < 1 {
        return Err(ConfigError::Validation(format!(
            "queue_growth_factor must be >= 1, got {}",
            factor
        )));
    }
    Ok(())
}

fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Must be sendable as an HTTP header value
    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: {:?}",
            user_agent
        )));
    }

    Ok(())
}

/// Checks that every noise selector is valid CSS
fn validate_selectors(selectors: &[String]) -> Result<(), ConfigError> {
    for selector in selectors {
        Selector::parse(selector)
            .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))?;
    }
    Ok(())
}
