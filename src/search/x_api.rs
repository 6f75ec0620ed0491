//! X API v2 client (OAuth 2.0 app-only, recent search)

use super::model::SearchPage;
use super::SearchApi;
use crate::{Error, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TWEET_FIELDS: &str = "created_at,public_metrics,author_id,text";
const USER_FIELDS: &str = "public_metrics,username,name,verified,created_at,profile_image_url";

/// API credentials read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Consumer key and secret, exchanged for a bearer token
    Consumer { key: String, secret: String },
    /// A bearer token provided directly
    Bearer(String),
}

impl Credentials {
    /// Read credentials from `X_BEARER_TOKEN`, or `X_CONSUMER_KEY` / `X_CONSUMER_SECRET`
    /// (falling back to `TWITTER_API_KEY` / `TWITTER_API_SECRET`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an explicit variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("X_BEARER_TOKEN") {
            return Ok(Credentials::Bearer(token));
        }
        let key = get("X_CONSUMER_KEY").or_else(|| get("TWITTER_API_KEY"));
        let secret = get("X_CONSUMER_SECRET").or_else(|| get("TWITTER_API_SECRET"));
        match (key, secret) {
            (Some(key), Some(secret)) => Ok(Credentials::Consumer { key, secret }),
            _ => Err(Error::MissingCredentials),
        }
    }
}

/// Blocking client for the recent-search endpoint
pub struct XClient {
    http: Client,
    base_url: String,
    bearer: String,
    max_results: u32,
}

impl XClient {
    /// Build a client, exchanging consumer credentials for a bearer token if needed
    pub fn connect(base_url: &str, credentials: &Credentials, max_results: u32) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("influencer-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let bearer = match credentials {
            Credentials::Bearer(token) => token.clone(),
            Credentials::Consumer { key, secret } => {
                fetch_bearer_token(&http, &base_url, key, secret)?
            }
        };

        Ok(Self {
            http,
            base_url,
            bearer,
            max_results: max_results.clamp(10, 100),
        })
    }
}

impl SearchApi for XClient {
    fn search_page(&self, query: &str, next_token: Option<&str>) -> Result<SearchPage> {
        let url = format!("{}/2/tweets/search/recent", self.base_url);
        let max_results = self.max_results.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("query", query),
            ("max_results", max_results.as_str()),
            ("tweet.fields", TWEET_FIELDS),
            ("user.fields", USER_FIELDS),
            ("expansions", "author_id"),
        ];
        if let Some(token) = next_token {
            params.push(("next_token", token));
        }

        log::info!("GET {} (next_token={:?})", url, next_token);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer)
            .query(&params)
            .send()?;

        let response = check_status(response)?;
        let body = response.text()?;
        SearchPage::parse(&body)
    }
}

/// OAuth 2.0 app-only token exchange
fn fetch_bearer_token(http: &Client, base_url: &str, key: &str, secret: &str) -> Result<String> {
    let url = format!("{}/oauth2/token", base_url);
    log::info!("POST {}", url);
    let response = http
        .post(&url)
        .basic_auth(key, Some(secret))
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded;charset=UTF-8",
        )
        .body("grant_type=client_credentials")
        .send()?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(Error::Auth(format!("token request returned {}: {}", status, body)));
    }

    let json: serde_json::Value = response.json()?;
    parse_token_response(&json)
}

/// Extract `access_token` from the token endpoint's JSON body
pub fn parse_token_response(json: &serde_json::Value) -> Result<String> {
    json["access_token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Auth("token response has no access_token".to_string()))
}

/// Map an HTTP status to the error taxonomy, passing successful responses through
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = rate_limit_reset(response.headers(), SystemTime::now());
    let body = response.text().unwrap_or_default();
    Err(status_error(status, body, retry_after))
}

pub(crate) fn status_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("search returned {}: {}", status, body))
        }
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited { retry_after },
        _ => Error::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Time until the `x-rate-limit-reset` epoch (seconds) in the headers, if any
pub(crate) fn rate_limit_reset(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    let reset: u64 = headers
        .get("x-rate-limit-reset")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    let now_secs = now.duration_since(UNIX_EPOCH).ok()?.as_secs();
    // One extra second so the window has actually reset
    Some(Duration::from_secs(reset.saturating_sub(now_secs) + 1))
}
