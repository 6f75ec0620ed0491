//! Keyword search: pagination, retry and per-query failure isolation

pub mod model;
pub mod x_api;

pub use model::{SearchPage, Tweet, TweetMetrics, User, UserMetrics};
pub use x_api::{Credentials, XClient};

use crate::config::{Config, QuerySpec, RetryConfig};
use crate::{Error, Result};
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

/// A source of search result pages
pub trait SearchApi {
    /// Fetch one page for `query`, continuing from `next_token` when given
    fn search_page(&self, query: &str, next_token: Option<&str>) -> Result<SearchPage>;
}

/// Pagination and retry settings for one run
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_pages: u32,
    pub retry: RetryConfig,
    pub page_delay: Duration,
    pub query_delay: Duration,
}

impl SearchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_pages: config.effective_max_pages(),
            retry: config.retry.clone(),
            page_delay: config.page_delay(),
            query_delay: config.query_delay(),
        }
    }
}

/// What one query produced
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub label: String,
    pub tweets: Vec<Tweet>,
    pub users: Vec<User>,
    pub pages_fetched: u32,
    /// Pages dropped because the response could not be used
    pub pages_skipped: u32,
    /// Set when the query was abandoned after persistent failures
    pub aborted: Option<String>,
}

impl QueryOutcome {
    /// Number of distinct authors among the returned users
    pub fn unique_authors(&self) -> usize {
        let mut ids: Vec<&str> = self.users.iter().map(|u| u.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

/// Everything collected over all queries, ready for aggregation
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// Tweets in fetch order
    pub tweets: Vec<Tweet>,
    /// Users by id; later sightings replace earlier ones
    pub users: HashMap<String, User>,
    pub outcomes: Vec<QueryOutcome>,
}

impl SearchResults {
    /// True when every query was aborted without fetching a single page
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| o.aborted.is_some() && o.pages_fetched == 0)
    }
}

/// Run a single query page by page.
///
/// Authentication errors are returned immediately. Rate limits, network
/// errors and 5xx responses are retried up to `retry.max_retries` times; if a
/// page still fails the query is abandoned and whatever was fetched so far is
/// kept. A malformed page is skipped, which ends the query since its cursor is
/// lost.
pub fn collect_query(
    api: &dyn SearchApi,
    spec: &QuerySpec,
    options: &SearchOptions,
) -> Result<QueryOutcome> {
    let mut outcome = QueryOutcome {
        label: spec.label.clone(),
        ..QueryOutcome::default()
    };
    let mut cursor: Option<String> = None;

    while outcome.pages_fetched < options.max_pages {
        let page = match fetch_with_retry(api, &spec.query, cursor.as_deref(), &options.retry) {
            Ok(page) => page,
            Err(e) if e.is_fatal() => return Err(e),
            Err(Error::Malformed(msg)) => {
                log::warn!("[{}] skipping malformed page: {}", spec.label, msg);
                outcome.pages_skipped += 1;
                break;
            }
            Err(e) => {
                log::warn!("[{}] giving up on query: {}", spec.label, e);
                outcome.aborted = Some(e.to_string());
                break;
            }
        };

        outcome.pages_fetched += 1;
        outcome.tweets.extend(page.tweets);
        outcome.users.extend(page.users);

        cursor = page.next_token;
        if cursor.is_none() || outcome.pages_fetched >= options.max_pages {
            break;
        }
        thread::sleep(options.page_delay);
    }

    Ok(outcome)
}

fn fetch_with_retry(
    api: &dyn SearchApi,
    query: &str,
    cursor: Option<&str>,
    retry: &RetryConfig,
) -> Result<SearchPage> {
    let mut attempt = 0;
    loop {
        match api.search_page(query, cursor) {
            Ok(page) => return Ok(page),
            Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                let wait = match &e {
                    Error::RateLimited { retry_after } => retry.rate_limit_delay(*retry_after),
                    _ => retry.backoff_delay(attempt),
                };
                log::warn!(
                    "{}; retrying in {}s (attempt {}/{})",
                    e,
                    wait.as_secs(),
                    attempt + 1,
                    retry.max_retries
                );
                thread::sleep(wait);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run all queries in order, pausing between them, and merge their results.
/// `on_outcome` is called after each query (for progress output).
pub fn run_queries<F>(
    api: &dyn SearchApi,
    queries: &[QuerySpec],
    options: &SearchOptions,
    mut on_outcome: F,
) -> Result<SearchResults>
where
    F: FnMut(&QueryOutcome),
{
    let mut results = SearchResults::default();

    for (i, spec) in queries.iter().enumerate() {
        if i > 0 {
            thread::sleep(options.query_delay);
        }
        let outcome = collect_query(api, spec, options)?;
        on_outcome(&outcome);

        results.tweets.extend(outcome.tweets.iter().cloned());
        for user in &outcome.users {
            results.users.insert(user.id.clone(), user.clone());
        }
        results.outcomes.push(outcome);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays scripted responses and records the cursors it was called with
    struct Scripted {
        responses: RefCell<VecDeque<Result<SearchPage>>>,
        calls: RefCell<Vec<Option<String>>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<SearchPage>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SearchApi for Scripted {
        fn search_page(&self, _query: &str, next_token: Option<&str>) -> Result<SearchPage> {
            self.calls.borrow_mut().push(next_token.map(str::to_string));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(SearchPage::default()))
        }
    }

    fn page(tweet_id: &str, next: Option<&str>) -> SearchPage {
        SearchPage {
            tweets: vec![Tweet {
                id: Some(tweet_id.to_string()),
                author_id: Some("u1".to_string()),
                ..Tweet::default()
            }],
            users: vec![User {
                id: "u1".to_string(),
                username: "alice".to_string(),
                ..User::default()
            }],
            next_token: next.map(str::to_string),
        }
    }

    fn options(max_pages: u32, max_retries: u32) -> SearchOptions {
        SearchOptions {
            max_pages,
            retry: RetryConfig {
                max_retries,
                rate_limit_wait_secs: 0,
                backoff_secs: 0,
                max_wait_secs: 0,
            },
            page_delay: Duration::ZERO,
            query_delay: Duration::ZERO,
        }
    }

    fn spec() -> QuerySpec {
        QuerySpec::new("test", "q")
    }

    #[test]
    fn test_follows_cursor_until_exhausted() {
        let api = Scripted::new(vec![
            Ok(page("1", Some("c1"))),
            Ok(page("2", Some("c2"))),
            Ok(page("3", None)),
        ]);
        let outcome = collect_query(&api, &spec(), &options(10, 0)).unwrap();
        assert_eq!(outcome.pages_fetched, 3);
        assert_eq!(outcome.tweets.len(), 3);
        assert!(outcome.aborted.is_none());
        assert_eq!(
            *api.calls.borrow(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[test]
    fn test_stops_at_page_limit() {
        let api = Scripted::new(vec![
            Ok(page("1", Some("c1"))),
            Ok(page("2", Some("c2"))),
            Ok(page("3", Some("c3"))),
        ]);
        let outcome = collect_query(&api, &spec(), &options(2, 0)).unwrap();
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(api.calls.borrow().len(), 2);
    }

    #[test]
    fn test_rate_limit_is_retried() {
        let api = Scripted::new(vec![
            Err(Error::RateLimited { retry_after: None }),
            Ok(page("1", None)),
        ]);
        let outcome = collect_query(&api, &spec(), &options(5, 3)).unwrap();
        assert_eq!(outcome.pages_fetched, 1);
        assert!(outcome.aborted.is_none());
        // Retry reuses the same cursor
        assert_eq!(*api.calls.borrow(), vec![None, None]);
    }

    #[test]
    fn test_persistent_failure_aborts_query_keeping_pages() {
        let api = Scripted::new(vec![
            Ok(page("1", Some("c1"))),
            Err(Error::Network("reset".into())),
            Err(Error::Network("reset".into())),
            Err(Error::Network("reset".into())),
        ]);
        let outcome = collect_query(&api, &spec(), &options(5, 2)).unwrap();
        assert_eq!(outcome.pages_fetched, 1);
        assert_eq!(outcome.tweets.len(), 1);
        assert!(outcome.aborted.as_deref().unwrap().contains("reset"));
        // 1 page + first try + 2 retries
        assert_eq!(api.calls.borrow().len(), 4);
    }

    #[test]
    fn test_client_error_not_retried() {
        let api = Scripted::new(vec![Err(Error::Status {
            status: 400,
            body: "bad query".into(),
        })]);
        let outcome = collect_query(&api, &spec(), &options(5, 3)).unwrap();
        assert!(outcome.aborted.is_some());
        assert_eq!(api.calls.borrow().len(), 1);
    }

    #[test]
    fn test_auth_failure_is_fatal() {
        let api = Scripted::new(vec![Err(Error::Auth("401".into()))]);
        let err = collect_query(&api, &spec(), &options(5, 3)).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_malformed_page_skipped() {
        let api = Scripted::new(vec![
            Ok(page("1", Some("c1"))),
            Err(Error::Malformed("bad json".into())),
        ]);
        let outcome = collect_query(&api, &spec(), &options(5, 3)).unwrap();
        assert_eq!(outcome.pages_fetched, 1);
        assert_eq!(outcome.pages_skipped, 1);
        assert!(outcome.aborted.is_none());
        assert_eq!(api.calls.borrow().len(), 2);
    }

    #[test]
    fn test_run_queries_continues_after_failed_query() {
        let api = Scripted::new(vec![
            Err(Error::Status {
                status: 400,
                body: String::new(),
            }),
            Ok(page("9", None)),
        ]);
        let queries = vec![QuerySpec::new("a", "qa"), QuerySpec::new("b", "qb")];
        let mut seen = Vec::new();
        let results = run_queries(&api, &queries, &options(5, 0), |o| seen.push(o.label.clone()))
            .unwrap();
        assert_eq!(seen, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(results.tweets.len(), 1);
        assert!(results.users.contains_key("u1"));
        assert!(!results.all_failed());
    }

    #[test]
    fn test_all_failed() {
        let api = Scripted::new(vec![Err(Error::Network("down".into()))]);
        let results =
            run_queries(&api, &[QuerySpec::new("a", "qa")], &options(5, 0), |_| {}).unwrap();
        assert!(results.all_failed());
    }

    #[test]
    fn test_unique_authors() {
        let outcome = QueryOutcome {
            users: vec![page("1", None).users[0].clone(), page("2", None).users[0].clone()],
            ..QueryOutcome::default()
        };
        assert_eq!(outcome.unique_authors(), 1);
    }
}
