// src/services/gateway.rs

//! WebVPN gateway authentication.
//!
//! The gateway is a reverse proxy that serves intranet pages under its own
//! domain and has its own login form; the campus CAS interaction happens
//! server-to-server, so the gateway is reachable from outside the campus
//! network.
//!
//! Login flow:
//! 1. GET `{gateway}/login` and grab the `_csrf` token
//! 2. POST `{gateway}/do-login` with credentials + `_csrf`
//! 3. On success the response sets a session cookie

use std::env;
use std::time::Duration;

use scraper::{Html, Selector};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::utils::http;

/// Environment variable holding the gateway username.
pub const USERNAME_ENV: &str = "ZJU_USERNAME";

/// Environment variable holding the gateway password.
pub const PASSWORD_ENV: &str = "ZJU_PASSWORD";

/// Campus CAS login URL fragment, seen when a session dies mid-run.
const CAS_LOGIN_MARKER: &str = "ids.zju.edu.cn/cas/login";

/// Gateway login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// Returns `None` unless both variables are set and non-empty; absence
    /// is a valid state, not an error.
    pub fn from_env() -> Option<Self> {
        let username = env::var(USERNAME_ENV).unwrap_or_default();
        let password = env::var(PASSWORD_ENV).unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

/// An authenticated gateway session.
///
/// Wraps the cookie-bearing HTTP client produced by a successful login. At
/// most one exists per run; a stale session is discarded wholesale, never
/// repaired.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
}

impl Session {
    /// The HTTP client carrying the gateway session cookie.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Process-wide authentication state, resolved once before any college runs.
#[derive(Debug, Clone)]
pub enum AuthState {
    /// No login attempt has been made
    NotAttempted,

    /// Credentials absent; running in public-source mode
    Skipped,

    /// Login succeeded
    Authenticated(Session),

    /// Login failed; running in public-source mode
    Failed(String),
}

impl AuthState {
    /// Whether an authenticated session is available.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The session, when authenticated.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Reply body of the gateway's `/do-login` endpoint.
///
/// `{"e":0,...}` on success, `{"e":1,"m":"..."}` on rejection.
#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default = "missing_code")]
    e: i64,
    #[serde(default)]
    m: Option<String>,
    #[serde(default)]
    d: Option<serde_json::Value>,
}

fn missing_code() -> i64 {
    -1
}

impl LoginReply {
    fn is_success(&self) -> bool {
        self.e == 0
    }

    fn message(&self) -> String {
        if let Some(m) = self.m.as_deref().filter(|m| !m.is_empty()) {
            return m.to_string();
        }
        if let Some(d) = &self.d {
            return d.to_string();
        }
        format!("e={}", self.e)
    }
}

/// Attempt the gateway login, at most once per run.
///
/// Never propagates an error: any failure (missing token, rejected
/// credentials, network error, malformed response) collapses into
/// [`AuthState::Failed`] so callers treat authentication as simply
/// unavailable.
pub async fn authenticate(config: &CrawlerConfig, credentials: Option<&Credentials>) -> AuthState {
    let Some(credentials) = credentials else {
        log::info!("[WebVPN] credentials not set, skipping login");
        return AuthState::Skipped;
    };

    match login(config, credentials).await {
        Ok(session) => {
            log::info!("[WebVPN] login succeeded");
            AuthState::Authenticated(session)
        }
        Err(e) => {
            log::warn!("[WebVPN] login failed: {e}; using fallback URLs");
            AuthState::Failed(e.to_string())
        }
    }
}

async fn login(config: &CrawlerConfig, credentials: &Credentials) -> Result<Session> {
    let client = http::create_session_client(config)?;
    let login_url = login_page_url(&config.gateway_base);

    log::info!("  → fetching gateway login page");
    let body = client
        .get(&login_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let csrf = extract_csrf(&body)
        .ok_or_else(|| AppError::auth("_csrf token not found in gateway login page"))?;

    let payload = [
        ("_csrf", csrf.as_str()),
        ("auth_type", "local"),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ];

    log::info!("  → submitting credentials to gateway");
    let response = client
        .post(format!(
            "{}/do-login",
            config.gateway_base.trim_end_matches('/')
        ))
        .form(&payload)
        .send()
        .await?
        .error_for_status()?;

    let final_url = response.url().to_string();
    let body = response.text().await?;

    match serde_json::from_str::<LoginReply>(&body) {
        Ok(reply) if reply.is_success() => {}
        Ok(reply) => {
            return Err(AppError::auth(format!(
                "gateway rejected login: {}",
                reply.message()
            )));
        }
        // Not JSON: landing back on the login page signals failure
        Err(_) => {
            if final_url.starts_with(&login_url) {
                return Err(AppError::auth(format!("login failed (landed on {final_url})")));
            }
        }
    }

    // Give the gateway a moment before the follow-up requests
    tokio::time::sleep(Duration::from_millis(config.login_settle_ms)).await;

    Ok(Session { client })
}

/// URL of the gateway's own login form.
pub fn login_page_url(gateway_base: &str) -> String {
    format!("{}/login", gateway_base.trim_end_matches('/'))
}

/// Extract the server-issued anti-forgery token from the login page body.
fn extract_csrf(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(r#"input[name="_csrf"]"#).expect("valid selector");
    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// Rewrite an intranet URL into the gateway's proxy form.
///
/// `http://cspo.zju.edu.cn/86671/list.htm` becomes
/// `https://webvpn.zju.edu.cn/http/cspo.zju.edu.cn/86671/list.htm`.
///
/// A URL without an http(s) scheme is a configuration defect, not a remote
/// condition, and fails hard.
pub fn proxy_url(gateway_base: &str, original: &str) -> Result<String> {
    let parsed = url::Url::parse(original)
        .map_err(|_| AppError::config(format!("Unrecognised URL: {original}")))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(AppError::config(format!(
            "Unrecognised URL scheme: {original}"
        )));
    }
    let rest = &original[scheme.len() + "://".len()..];
    Ok(format!(
        "{}/{}/{}",
        gateway_base.trim_end_matches('/'),
        scheme,
        rest
    ))
}

/// Whether a final response URL indicates the gateway session is gone.
pub fn is_login_redirect(gateway_base: &str, final_url: &str) -> bool {
    final_url.starts_with(&login_page_url(gateway_base)) || final_url.contains(CAS_LOGIN_MARKER)
}
