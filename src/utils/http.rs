// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = builder(config)?.build()?;
    Ok(client)
}

/// Create a client with a cookie jar, for the gateway login session.
pub fn create_session_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = builder(config)?.cookie_store(true).build()?;
    Ok(client)
}

fn builder(config: &CrawlerConfig) -> Result<reqwest::ClientBuilder> {
    Ok(reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(default_headers(config)?)
        .timeout(Duration::from_secs(config.timeout_secs)))
}

fn default_headers(config: &CrawlerConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value(&config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::config(format!("Invalid header value '{value}': {e}")))
}
