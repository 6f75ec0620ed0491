//! Scout: find and rank influencers on X
//!
//! This library searches recent posts for tracked keywords, folds them into
//! per-author records, scores each author's engagement and classifies them
//! into hiring recommendations that can be written as CSV or HTML reports.

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod logger;
pub mod reporter;
pub mod search;

pub use error::{Error, Result};

use serde::{Deserialize, Serialize};

/// Maximum characters kept from a sample tweet
pub const MAX_SAMPLE_CHARS: usize = 500;

/// One author seen in search results, with counts accumulated over all matched tweets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRecord {
    /// API user id (dedup key)
    pub user_id: String,
    /// Handle without the leading @
    pub username: String,
    /// Display name
    pub name: String,
    pub verified: bool,
    pub followers_count: u64,
    pub following_count: u64,
    pub listed_count: u64,
    /// Account creation timestamp as returned by the API (ISO 8601), may be empty
    pub created_at: String,
    pub profile_image_url: String,
    /// Number of matched tweets by this author
    pub tweets_found: u32,
    pub total_likes: u64,
    pub total_retweets: u64,
    pub total_replies: u64,
    /// Bounded list of sample tweets in the order they were seen
    pub samples: Vec<SampleTweet>,
}

impl AuthorRecord {
    /// Likes + 2×retweets + replies, used to break follower ties in the find report
    pub fn weighted_engagement(&self) -> u64 {
        self.total_likes
            .saturating_add(self.total_retweets.saturating_mul(2))
            .saturating_add(self.total_replies)
    }
}

/// A matched tweet kept as an example of what the author wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTweet {
    pub id: Option<String>,
    pub text: String,
    pub created_at: Option<String>,
}

/// Derived engagement metrics for one author
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Sum of interactions on the matched tweets
    pub total_engagement: u64,
    /// Interactions per follower (never negative)
    pub engagement_rate: f64,
}

/// Hiring recommendation bucket
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Recommendation {
    #[serde(rename = "Strong hire")]
    StrongHire,
    #[serde(rename = "Consider")]
    Consider,
    #[serde(rename = "Skip")]
    #[default]
    Skip,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::StrongHire,
        Recommendation::Consider,
        Recommendation::Skip,
    ];

    /// Sort rank: Strong hire first, Skip last
    pub fn rank(self) -> u8 {
        match self {
            Recommendation::StrongHire => 0,
            Recommendation::Consider => 1,
            Recommendation::Skip => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::StrongHire => "Strong hire",
            Recommendation::Consider => "Consider",
            Recommendation::Skip => "Skip",
        }
    }

    /// CSS-friendly slug ("strong-hire", "consider", "skip")
    pub fn slug(self) -> &'static str {
        match self {
            Recommendation::StrongHire => "strong-hire",
            Recommendation::Consider => "consider",
            Recommendation::Skip => "skip",
        }
    }

    /// Parse a label as written in the CSV. Unknown labels are treated as Skip.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Strong hire" => Recommendation::StrongHire,
            "Consider" => Recommendation::Consider,
            _ => Recommendation::Skip,
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An author together with metrics and the recommendation derived from them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub author: AuthorRecord,
    pub metrics: Metrics,
    pub recommendation: Recommendation,
    /// Human-readable reason for the recommendation
    pub reason: String,
}

/// Count of assessments per recommendation bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCounts {
    pub strong_hire: usize,
    pub consider: usize,
    pub skip: usize,
}

impl RecommendationCounts {
    pub fn from_assessments(assessments: &[Assessment]) -> Self {
        let mut counts = Self::default();
        for a in assessments {
            match a.recommendation {
                Recommendation::StrongHire => counts.strong_hire += 1,
                Recommendation::Consider => counts.consider += 1,
                Recommendation::Skip => counts.skip += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.strong_hire + self.consider + self.skip
    }
}

/// Format a ratio as a percentage with two decimals (0.05 -> "5.00%")
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Public API: score, classify and rank aggregated authors using the given config.
pub fn assess_authors(authors: Vec<AuthorRecord>, config: &config::Config) -> Vec<Assessment> {
    let mut assessments: Vec<Assessment> = authors
        .into_iter()
        .map(|author| analyzer::assess(author, &config.engagement, &config.thresholds))
        .collect();
    analyzer::ranking::sort_for_recommendations(&mut assessments);
    assessments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_labels_round_trip() {
        for rec in Recommendation::ALL {
            assert_eq!(Recommendation::from_label(rec.as_str()), rec);
        }
        assert_eq!(Recommendation::from_label("garbage"), Recommendation::Skip);
    }

    #[test]
    fn test_recommendation_serde_uses_labels() {
        let json = serde_json::to_string(&Recommendation::StrongHire).unwrap();
        assert_eq!(json, "\"Strong hire\"");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.05), "5.00%");
        assert_eq!(format_percent(0.0008), "0.08%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("🚀🚀🚀", 1), "🚀");
    }

    #[test]
    fn test_weighted_engagement() {
        let a = AuthorRecord {
            total_likes: 10,
            total_retweets: 3,
            total_replies: 2,
            ..AuthorRecord::default()
        };
        assert_eq!(a.weighted_engagement(), 18);
    }

    #[test]
    fn test_weighted_engagement_saturates() {
        let a = AuthorRecord {
            total_likes: u64::MAX,
            total_retweets: u64::MAX / 2 + 1,
            total_replies: 1,
            ..AuthorRecord::default()
        };
        assert_eq!(a.weighted_engagement(), u64::MAX);
    }

    #[test]
    fn test_counts() {
        let mk = |rec| Assessment {
            author: AuthorRecord::default(),
            metrics: Metrics::default(),
            recommendation: rec,
            reason: String::new(),
        };
        let list = vec![
            mk(Recommendation::Skip),
            mk(Recommendation::StrongHire),
            mk(Recommendation::Skip),
        ];
        let c = RecommendationCounts::from_assessments(&list);
        assert_eq!(c.strong_hire, 1);
        assert_eq!(c.consider, 0);
        assert_eq!(c.skip, 2);
        assert_eq!(c.total(), 3);
    }
}
