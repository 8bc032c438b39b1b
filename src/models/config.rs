//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SourceConfig;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and scraping behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Output file for the aggregated JSON document
    #[serde(default = "defaults::output_path")]
    pub output_path: PathBuf,

    /// College definitions, in scrape order
    #[serde(default = "defaults::sources")]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.pages_to_fetch == 0 {
            return Err(AppError::validation("crawler.pages_to_fetch must be > 0"));
        }
        if self.crawler.max_retries == 0 {
            return Err(AppError::validation("crawler.max_retries must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        for source in &self.sources {
            if source.id.trim().is_empty() || source.name.trim().is_empty() {
                return Err(AppError::validation("Source with empty id or name"));
            }
            Self::validate_url(&source.id, "list_url", &source.list_url)?;
            match (&source.intranet_url, &source.intranet_base) {
                (Some(url), Some(_)) => Self::validate_url(&source.id, "intranet_url", url)?,
                (None, None) => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Source '{}' must declare intranet_url and intranet_base together",
                        source.id
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_url(id: &str, field: &str, url: &str) -> Result<()> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Source '{id}': {field} must be an http(s) URL, got '{url}'"
            )))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            output_path: defaults::output_path(),
            sources: defaults::sources(),
        }
    }
}

/// HTTP client and scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header sent on every request
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Accept-Language header sent on every request
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// How many list pages to fetch per college
    #[serde(default = "defaults::pages_to_fetch")]
    pub pages_to_fetch: u32,

    /// Attempts per page before giving up
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Linear backoff unit between retries, in seconds (attempt N waits N units)
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_secs: u64,

    /// Politeness delay between successive pages, in milliseconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,

    /// Politeness delay between successive colleges, in milliseconds
    #[serde(default = "defaults::department_delay")]
    pub department_delay_ms: u64,

    /// Settle delay after a successful gateway login, in milliseconds
    #[serde(default = "defaults::login_settle")]
    pub login_settle_ms: u64,

    /// Base URL of the WebVPN gateway
    #[serde(default = "defaults::gateway_base")]
    pub gateway_base: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            pages_to_fetch: defaults::pages_to_fetch(),
            max_retries: defaults::max_retries(),
            retry_backoff_secs: defaults::retry_backoff(),
            page_delay_ms: defaults::page_delay(),
            department_delay_ms: defaults::department_delay(),
            login_settle_ms: defaults::login_settle(),
            gateway_base: defaults::gateway_base(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::SourceConfig;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn accept() -> String {
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into()
    }
    pub fn accept_language() -> String {
        "zh-CN,zh;q=0.9,en;q=0.8".into()
    }
    pub fn timeout() -> u64 {
        25
    }
    pub fn pages_to_fetch() -> u32 {
        2
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_backoff() -> u64 {
        3
    }
    pub fn page_delay() -> u64 {
        1000
    }
    pub fn department_delay() -> u64 {
        2000
    }
    pub fn login_settle() -> u64 {
        1000
    }
    pub fn gateway_base() -> String {
        "https://webvpn.zju.edu.cn".into()
    }

    pub fn output_path() -> PathBuf {
        PathBuf::from("docs/data.json")
    }

    // College defaults
    pub fn sources() -> Vec<SourceConfig> {
        vec![
            SourceConfig {
                id: "sis".to_string(),
                name: "外国语学院".to_string(),
                list_url: "http://www.sis.zju.edu.cn/sischinese/12577/list.htm".to_string(),
                base_url: "http://www.sis.zju.edu.cn".to_string(),
                intranet_url: None,
                intranet_base: None,
            },
            SourceConfig {
                id: "cs".to_string(),
                name: "计算机科学与技术学院".to_string(),
                // Original intranet notices (即时更新), campus network only
                intranet_url: Some("http://cspo.zju.edu.cn/86671/list.htm".to_string()),
                intranet_base: Some("http://cspo.zju.edu.cn".to_string()),
                // Public fallback: college news (新闻动态), globally accessible
                list_url: "http://www.cs.zju.edu.cn/csen/xwdt_38564/list.htm".to_string(),
                base_url: "http://www.cs.zju.edu.cn".to_string(),
            },
            SourceConfig {
                id: "ckc".to_string(),
                name: "竺可桢学院".to_string(),
                list_url: "http://ckc.zju.edu.cn/54005/list.htm".to_string(),
                base_url: "http://ckc.zju.edu.cn".to_string(),
                intranet_url: None,
                intranet_base: None,
            },
        ]
    }
}
