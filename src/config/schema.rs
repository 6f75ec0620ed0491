//! Config schema and deserialization

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A labelled search query (X API v2 query syntax)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    /// Short name used in console output
    pub label: String,
    /// Raw query string passed to the search endpoint
    pub query: String,
}

impl QuerySpec {
    pub fn new(label: &str, query: &str) -> Self {
        Self {
            label: label.to_string(),
            query: query.to_string(),
        }
    }
}

/// Queries tracked when the config does not name any
pub fn default_queries() -> Vec<QuerySpec> {
    vec![
        QuerySpec::new(
            "Euphoria_fi",
            r#"(Euphoria_fi OR euphoria.fi OR "x.com/Euphoria_fi") -is:retweet lang:en"#,
        ),
        QuerySpec::new(
            "Polymarket 5 min",
            r#"("Polymarket 5 min" OR "Polymarket 5min") -is:retweet lang:en"#,
        ),
    ]
}

/// Retry policy for the search client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    /// Retries per page after the first attempt
    pub max_retries: u32,
    /// Wait after a 429 when the API gives no reset time
    pub rate_limit_wait_secs: u64,
    /// Base delay for network / 5xx retries, doubled on each attempt
    pub backoff_secs: u64,
    /// Upper bound for any single wait
    pub max_wait_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            rate_limit_wait_secs: 60,
            backoff_secs: 2,
            max_wait_secs: 900,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based) of a network / 5xx failure
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let secs = self.backoff_secs.saturating_mul(factor).min(self.max_wait_secs);
        Duration::from_secs(secs)
    }

    /// Delay after a rate-limit response
    pub fn rate_limit_delay(&self, retry_after: Option<Duration>) -> Duration {
        let max = Duration::from_secs(self.max_wait_secs);
        retry_after
            .unwrap_or(Duration::from_secs(self.rate_limit_wait_secs))
            .min(max)
    }
}

/// Classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    /// Skip when following > ratio × followers (bots, follow-back accounts)
    pub max_following_ratio: f64,
    /// Skip when the audience is smaller than this
    pub min_followers: u64,
    /// Skip when the engagement rate is below this
    pub min_engagement_rate: f64,
    pub min_followers_strong: u64,
    pub min_engagement_rate_strong: f64,
    pub min_engagement_strong: u64,
    /// Consider needs this many followers
    pub min_followers_consider: u64,
    /// Consider needs this rate, unless the audience-size path below applies
    pub min_engagement_rate_consider: f64,
    /// Engagements that let a large audience qualify for Consider under the rate
    pub min_engagement_consider: u64,
    /// Followers needed for the audience-size path into Consider
    pub large_audience_consider: u64,
    /// Followers above which a zero-engagement account is called a dead feed
    pub large_audience: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_following_ratio: 50.0,
            min_followers: 1_000,
            min_engagement_rate: 0.00005,
            min_followers_strong: 5_000,
            min_engagement_rate_strong: 0.0008,
            min_engagement_strong: 20,
            min_followers_consider: 2_000,
            min_engagement_rate_consider: 0.0002,
            min_engagement_consider: 5,
            large_audience_consider: 10_000,
            large_audience: 100_000,
        }
    }
}

/// How engagement is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngagementConfig {
    /// Add replies to likes + retweets
    pub count_replies: bool,
    /// Divide the rate by the number of matched tweets
    pub per_tweet: bool,
}

/// Root config structure for .scoutrc.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Search queries (default: the two built-in keyword searches)
    #[serde(default)]
    pub queries: Vec<QuerySpec>,

    /// Results per page (10..=100)
    #[serde(default)]
    pub max_results: Option<u32>,

    /// Page limit per query
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Sample tweets kept per author
    #[serde(default)]
    pub sample_limit: Option<usize>,

    /// Pause between pages of one query
    #[serde(default)]
    pub page_delay_ms: Option<u64>,

    /// Pause between queries
    #[serde(default)]
    pub query_delay_ms: Option<u64>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub engagement: EngagementConfig,

    /// Directory for CSV/HTML output (default: current directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Search API base URL
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Base URL for profile and tweet links in reports
    #[serde(default)]
    pub profile_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extends: None,
            queries: Vec::new(),
            max_results: None,
            max_pages: None,
            sample_limit: None,
            page_delay_ms: None,
            query_delay_ms: None,
            retry: RetryConfig::default(),
            thresholds: Thresholds::default(),
            engagement: EngagementConfig::default(),
            output_dir: None,
            api_base_url: None,
            profile_base_url: None,
        }
    }
}

impl Config {
    pub const DEFAULT_MAX_RESULTS: u32 = 100;
    pub const DEFAULT_MAX_PAGES: u32 = 5;
    pub const DEFAULT_SAMPLE_LIMIT: usize = 5;
    pub const DEFAULT_API_BASE_URL: &'static str = "https://api.twitter.com";
    pub const DEFAULT_PROFILE_BASE_URL: &'static str = "https://x.com";

    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, max_pages: Option<u32>, output_dir: Option<PathBuf>) -> Self {
        if max_pages.is_some() {
            self.max_pages = max_pages;
        }
        if output_dir.is_some() {
            self.output_dir = output_dir;
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.queries.is_empty() {
            self.queries = base.queries;
        }
        self.max_results = self.max_results.or(base.max_results);
        self.max_pages = self.max_pages.or(base.max_pages);
        self.sample_limit = self.sample_limit.or(base.sample_limit);
        self.page_delay_ms = self.page_delay_ms.or(base.page_delay_ms);
        self.query_delay_ms = self.query_delay_ms.or(base.query_delay_ms);
        if self.output_dir.is_none() {
            self.output_dir = base.output_dir;
        }
        if self.api_base_url.is_none() {
            self.api_base_url = base.api_base_url;
        }
        if self.profile_base_url.is_none() {
            self.profile_base_url = base.profile_base_url;
        }
        // Nested sections: inherit only when this config left them at defaults
        if self.retry == RetryConfig::default() {
            self.retry = base.retry;
        }
        if self.thresholds == Thresholds::default() {
            self.thresholds = base.thresholds;
        }
        if self.engagement == EngagementConfig::default() {
            self.engagement = base.engagement;
        }
    }

    pub fn effective_queries(&self) -> Vec<QuerySpec> {
        if self.queries.is_empty() {
            default_queries()
        } else {
            self.queries.clone()
        }
    }

    /// Results per page, clamped to what the recent-search endpoint accepts
    pub fn effective_max_results(&self) -> u32 {
        self.max_results
            .unwrap_or(Self::DEFAULT_MAX_RESULTS)
            .clamp(10, 100)
    }

    pub fn effective_max_pages(&self) -> u32 {
        self.max_pages.unwrap_or(Self::DEFAULT_MAX_PAGES).max(1)
    }

    pub fn effective_sample_limit(&self) -> usize {
        self.sample_limit.unwrap_or(Self::DEFAULT_SAMPLE_LIMIT)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms.unwrap_or(1_000))
    }

    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms.unwrap_or(2_000))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn profile_base_url(&self) -> &str {
        self.profile_base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_PROFILE_BASE_URL)
            .trim_end_matches('/')
    }
}
