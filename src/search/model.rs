//! Wire types for the X API v2 recent-search response

use serde::Deserialize;

/// Engagement counters on a tweet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TweetMetrics {
    pub like_count: u64,
    pub retweet_count: u64,
    pub reply_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<TweetMetrics>,
}

/// Audience counters on a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserMetrics {
    pub followers_count: u64,
    pub following_count: u64,
    pub listed_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<UserMetrics>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    next_token: Option<String>,
    #[serde(default)]
    result_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<Tweet>>,
    #[serde(default)]
    includes: Option<Includes>,
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    errors: Option<Vec<serde_json::Value>>,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub tweets: Vec<Tweet>,
    pub users: Vec<User>,
    pub next_token: Option<String>,
}

impl SearchPage {
    /// Parse a recent-search response body.
    ///
    /// An empty result (`result_count: 0`, no `data`) is a valid page. A body
    /// that carries only `errors` and nothing else is reported as malformed.
    pub fn parse(body: &str) -> crate::Result<Self> {
        let response: SearchResponse = serde_json::from_str(body)
            .map_err(|e| crate::Error::Malformed(format!("invalid search JSON: {}", e)))?;

        let has_payload =
            response.data.is_some() || response.includes.is_some() || response.meta.is_some();
        if !has_payload {
            let detail = response
                .errors
                .as_ref()
                .and_then(|errs| errs.first())
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no data, includes or meta".to_string());
            return Err(crate::Error::Malformed(detail));
        }

        if let Some(ref errors) = response.errors {
            log::warn!("Search page reported {} partial error(s)", errors.len());
        }

        let meta = response.meta.unwrap_or_default();
        if let Some(count) = meta.result_count {
            log::debug!("Search page result_count={}", count);
        }

        Ok(Self {
            tweets: response.data.unwrap_or_default(),
            users: response.includes.unwrap_or_default().users,
            next_token: meta.next_token.filter(|t| !t.is_empty()),
        })
    }
}
