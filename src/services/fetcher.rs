// src/services/fetcher.rs

//! Paginated list-page fetching with bounded retries.

use std::time::Duration;

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::services::gateway::{self, AuthState, Session};
use crate::utils::http;

/// Fetches listing pages, through the gateway session when required.
pub struct PageFetcher {
    config: CrawlerConfig,
    client: reqwest::Client,
    session: Option<Session>,
}

impl PageFetcher {
    /// Create a fetcher from the resolved authentication state.
    pub fn new(config: &CrawlerConfig, auth: &AuthState) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            client: http::create_client(config)?,
            session: auth.session().cloned(),
        })
    }

    /// Fetch one listing page and parse it as HTML.
    ///
    /// Transient failures (network error, timeout, HTTP error status, decode
    /// error) are retried up to `max_retries` times with a linearly growing
    /// delay; exhaustion returns `Ok(None)`, a recoverable "no more pages"
    /// condition. A gateway fetch that lands back on a login page fails
    /// immediately with [`AppError::SessionExpired`] instead — retrying a
    /// dead session is futile.
    pub async fn fetch_page(&self, url: &str, via_gateway: bool) -> Result<Option<Html>> {
        let fetch_url = if via_gateway {
            gateway::proxy_url(&self.config.gateway_base, url)?
        } else {
            url.to_string()
        };

        let client = match (&self.session, via_gateway) {
            (Some(session), true) => session.client(),
            _ => &self.client,
        };

        for attempt in 1..=self.config.max_retries {
            match self.try_fetch(client, &fetch_url, via_gateway).await {
                Ok(document) => return Ok(Some(document)),
                Err(e) if e.is_session_expired() => return Err(e),
                Err(e) => {
                    log::warn!(
                        "  attempt {}/{} failed for {}: {}",
                        attempt,
                        self.config.max_retries,
                        fetch_url,
                        e
                    );
                    if attempt < self.config.max_retries {
                        let backoff = self.config.retry_backoff_secs * u64::from(attempt);
                        tokio::time::sleep(Duration::from_secs(backoff)).await;
                    }
                }
            }
        }

        Ok(None)
    }

    async fn try_fetch(
        &self,
        client: &reqwest::Client,
        url: &str,
        via_gateway: bool,
    ) -> Result<Html> {
        let response = client.get(url).send().await?;
        let final_url = response.url().to_string();

        if via_gateway && gateway::is_login_redirect(&self.config.gateway_base, &final_url) {
            return Err(AppError::SessionExpired { url: final_url });
        }

        // Decode with the header-declared charset, falling back to UTF-8
        let text = response
            .error_for_status()?
            .text_with_charset("utf-8")
            .await?;
        Ok(Html::parse_document(&text))
    }
}
