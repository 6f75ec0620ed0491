//! JSON reporter for machine-readable output

use crate::{Assessment, RecommendationCounts};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Ranked assessments plus per-bucket counts
    pub fn report(&self, assessments: &[Assessment]) -> String {
        let output = JsonOutput {
            summary: RecommendationCounts::from_assessments(assessments),
            authors: assessments.iter().map(JsonAuthor::from).collect(),
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    summary: RecommendationCounts,
    authors: Vec<JsonAuthor<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonAuthor<'a> {
    username: &'a str,
    name: &'a str,
    recommendation: &'static str,
    reason: &'a str,
    followers_count: u64,
    following_count: u64,
    tweets_found: u32,
    total_engagement: u64,
    engagement_rate: f64,
    verified: bool,
}

impl<'a> From<&'a Assessment> for JsonAuthor<'a> {
    fn from(a: &'a Assessment) -> Self {
        Self {
            username: &a.author.username,
            name: &a.author.name,
            recommendation: a.recommendation.as_str(),
            reason: &a.reason,
            followers_count: a.author.followers_count,
            following_count: a.author.following_count,
            tweets_found: a.author.tweets_found,
            total_engagement: a.metrics.total_engagement,
            engagement_rate: a.metrics.engagement_rate,
            verified: a.author.verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthorRecord, Metrics, Recommendation};

    fn assessment(name: &str, rec: Recommendation) -> Assessment {
        Assessment {
            author: AuthorRecord {
                username: name.into(),
                followers_count: 10_000,
                ..AuthorRecord::default()
            },
            metrics: Metrics {
                total_engagement: 500,
                engagement_rate: 0.05,
            },
            recommendation: rec,
            reason: "ER 5.00%, 500 engagements, live audience".into(),
        }
    }

    #[test]
    fn test_report_summary_and_authors() {
        let list = vec![
            assessment("alice", Recommendation::StrongHire),
            assessment("bob", Recommendation::Skip),
        ];
        let json = JsonReporter::new().report(&list);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["summary"]["strongHire"], 1);
        assert_eq!(parsed["summary"]["consider"], 0);
        assert_eq!(parsed["summary"]["skip"], 1);
        assert_eq!(parsed["authors"][0]["username"], "alice");
        assert_eq!(parsed["authors"][0]["recommendation"], "Strong hire");
        assert_eq!(parsed["authors"][1]["followersCount"], 10_000);
    }

    #[test]
    fn test_pretty_output() {
        let json = JsonReporter::new()
            .pretty()
            .report(&[assessment("alice", Recommendation::Consider)]);
        assert!(json.contains('\n'));
        assert!(json.contains("  \"summary\""));
    }

    #[test]
    fn test_empty_report() {
        let json = JsonReporter::new().report(&[]);
        assert_eq!(
            json,
            r#"{"summary":{"strongHire":0,"consider":0,"skip":0},"authors":[]}"#
        );
    }
}
