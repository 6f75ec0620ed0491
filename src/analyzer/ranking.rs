//! Sort orders used by the reports
//!
//! All sorts are stable, so ties keep their incoming order.

use crate::{Assessment, AuthorRecord, Recommendation};
use std::cmp::Ordering;

/// Reach order for the find report: followers desc, then weighted engagement desc
pub fn sort_by_reach(authors: &mut [AuthorRecord]) {
    authors.sort_by(|a, b| {
        b.followers_count
            .cmp(&a.followers_count)
            .then_with(|| b.weighted_engagement().cmp(&a.weighted_engagement()))
    });
}

/// Recommendation order: bucket, then engagement rate desc, then followers desc
pub fn sort_for_recommendations(assessments: &mut [Assessment]) {
    assessments.sort_by(|a, b| {
        by_bucket_then_rate(
            a.recommendation,
            a.metrics.engagement_rate,
            b.recommendation,
            b.metrics.engagement_rate,
        )
        .then_with(|| b.author.followers_count.cmp(&a.author.followers_count))
    });
}

/// Bucket first (Strong hire < Consider < Skip), then higher rate first
pub fn by_bucket_then_rate(
    rec_a: Recommendation,
    rate_a: f64,
    rec_b: Recommendation,
    rate_b: f64,
) -> Ordering {
    rec_a
        .rank()
        .cmp(&rec_b.rank())
        .then_with(|| rate_b.total_cmp(&rate_a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Metrics;

    fn record(name: &str, followers: u64, likes: u64) -> AuthorRecord {
        AuthorRecord {
            username: name.into(),
            followers_count: followers,
            total_likes: likes,
            ..AuthorRecord::default()
        }
    }

    fn assessment(name: &str, rec: Recommendation, rate: f64, followers: u64) -> Assessment {
        Assessment {
            author: record(name, followers, 0),
            metrics: Metrics {
                total_engagement: 1,
                engagement_rate: rate,
            },
            recommendation: rec,
            reason: String::new(),
        }
    }

    fn names(list: &[Assessment]) -> Vec<&str> {
        list.iter().map(|a| a.author.username.as_str()).collect()
    }

    #[test]
    fn test_sort_by_reach() {
        let mut authors = vec![
            record("small", 100, 50),
            record("big_quiet", 9_000, 1),
            record("big_loud", 9_000, 40),
        ];
        sort_by_reach(&mut authors);
        let order: Vec<&str> = authors.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(order, vec!["big_loud", "big_quiet", "small"]);
    }

    #[test]
    fn test_sort_for_recommendations() {
        let mut list = vec![
            assessment("skip", Recommendation::Skip, 0.9, 10),
            assessment("consider", Recommendation::Consider, 0.01, 10),
            assessment("strong_low", Recommendation::StrongHire, 0.001, 10),
            assessment("strong_high", Recommendation::StrongHire, 0.05, 10),
        ];
        sort_for_recommendations(&mut list);
        assert_eq!(
            names(&list),
            vec!["strong_high", "strong_low", "consider", "skip"]
        );
    }

    #[test]
    fn test_rate_tie_broken_by_followers() {
        let mut list = vec![
            assessment("fewer", Recommendation::Consider, 0.01, 2_000),
            assessment("more", Recommendation::Consider, 0.01, 9_000),
        ];
        sort_for_recommendations(&mut list);
        assert_eq!(names(&list), vec!["more", "fewer"]);
    }
}
