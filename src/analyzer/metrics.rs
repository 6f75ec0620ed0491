//! Engagement metrics

use crate::config::EngagementConfig;
use crate::{AuthorRecord, Metrics};

/// Compute total engagement and engagement rate for one author.
///
/// By default engagement is likes + retweets and the rate is engagement per
/// follower (followers floored at 1).
pub fn compute(author: &AuthorRecord, config: &EngagementConfig) -> Metrics {
    let total_engagement = total_engagement(author, config);

    let mut denominator = author.followers_count.max(1) as f64;
    if config.per_tweet {
        denominator *= author.tweets_found.max(1) as f64;
    }

    Metrics {
        total_engagement,
        engagement_rate: total_engagement as f64 / denominator,
    }
}

pub fn total_engagement(author: &AuthorRecord, config: &EngagementConfig) -> u64 {
    let mut total = author.total_likes.saturating_add(author.total_retweets);
    if config.count_replies {
        total = total.saturating_add(author.total_replies);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(followers: u64, likes: u64, retweets: u64, replies: u64) -> AuthorRecord {
        AuthorRecord {
            followers_count: followers,
            total_likes: likes,
            total_retweets: retweets,
            total_replies: replies,
            tweets_found: 2,
            ..AuthorRecord::default()
        }
    }

    #[test]
    fn test_default_formula() {
        let m = compute(&author(10_000, 400, 100, 50), &EngagementConfig::default());
        assert_eq!(m.total_engagement, 500);
        assert!((m.engagement_rate - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_zero_followers_floored() {
        let m = compute(&author(0, 3, 0, 0), &EngagementConfig::default());
        assert_eq!(m.engagement_rate, 3.0);
    }

    #[test]
    fn test_count_replies() {
        let config = EngagementConfig {
            count_replies: true,
            per_tweet: false,
        };
        assert_eq!(compute(&author(100, 1, 2, 3), &config).total_engagement, 6);
    }

    #[test]
    fn test_per_tweet() {
        let config = EngagementConfig {
            count_replies: false,
            per_tweet: true,
        };
        let m = compute(&author(100, 10, 10, 0), &config);
        assert!((m.engagement_rate - 0.1).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn metrics_never_negative(
            followers in 0u64..10_000_000,
            likes in 0u64..1_000_000,
            retweets in 0u64..1_000_000,
            replies in 0u64..1_000_000,
            tweets in 0u32..500,
            count_replies in any::<bool>(),
            per_tweet in any::<bool>(),
        ) {
            let a = AuthorRecord {
                followers_count: followers,
                total_likes: likes,
                total_retweets: retweets,
                total_replies: replies,
                tweets_found: tweets,
                ..AuthorRecord::default()
            };
            let m = compute(&a, &EngagementConfig { count_replies, per_tweet });
            prop_assert!(m.engagement_rate >= 0.0);
            prop_assert!(m.engagement_rate.is_finite());
            prop_assert!(m.total_engagement >= likes + retweets);
        }
    }
}
