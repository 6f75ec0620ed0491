//! Threshold rules mapping an author to a recommendation
//!
//! Rules are checked in order and the first match wins:
//! 1. Skip: suspicious following ratio, zero engagement, tiny audience or
//!    negligible engagement rate (every cause that applies is cited)
//! 2. Strong hire: audience, rate and engagement all above the strong minimums
//! 3. Consider: enough followers plus either a decent rate or, for large
//!    audiences, a handful of engagements
//! 4. Skip: everything below the Consider gate

use crate::config::Thresholds;
use crate::{format_percent, AuthorRecord, Metrics, Recommendation, SampleTweet};
use regex::Regex;
use std::sync::OnceLock;

/// Outcome of classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub recommendation: Recommendation,
    pub reason: String,
}

impl Verdict {
    fn new(recommendation: Recommendation, reason: String) -> Self {
        Self {
            recommendation,
            reason,
        }
    }
}

pub fn classify(author: &AuthorRecord, metrics: &Metrics, thresholds: &Thresholds) -> Verdict {
    let skip_reasons = skip_reasons(author, metrics, thresholds);
    if !skip_reasons.is_empty() {
        return Verdict::new(Recommendation::Skip, skip_reasons.join("; "));
    }

    let followers = author.followers_count;
    let er = metrics.engagement_rate;
    let total = metrics.total_engagement;

    if followers >= thresholds.min_followers_strong
        && er >= thresholds.min_engagement_rate_strong
        && total >= thresholds.min_engagement_strong
    {
        let mut reason = format!(
            "ER {}, {} engagements, live audience",
            format_percent(er),
            total
        );
        if looks_like_promo(&author.samples) {
            reason.push_str(", already does promo-style content");
        }
        return Verdict::new(Recommendation::StrongHire, reason);
    }

    if followers < thresholds.min_followers_consider {
        return Verdict::new(Recommendation::Skip, BELOW_CONSIDER.to_string());
    }
    if er >= thresholds.min_engagement_rate_consider {
        let reason = format!("ER {}, {} engagements", format_percent(er), total);
        return Verdict::new(Recommendation::Consider, reason);
    }
    if total >= thresholds.min_engagement_consider && followers >= thresholds.large_audience_consider
    {
        let reason = format!(
            "Large audience ({}), some engagement ({})",
            followers, total
        );
        return Verdict::new(Recommendation::Consider, reason);
    }
    Verdict::new(Recommendation::Skip, BELOW_CONSIDER.to_string())
}

const BELOW_CONSIDER: &str = "Below Consider threshold";

fn skip_reasons(author: &AuthorRecord, metrics: &Metrics, thresholds: &Thresholds) -> Vec<String> {
    let followers = author.followers_count;
    let following = author.following_count;
    let mut reasons = Vec::new();

    if following as f64 > thresholds.max_following_ratio * followers.max(1) as f64 {
        reasons.push(format!(
            "Following >> followers ({} vs {}), likely bot or follow-back account",
            following, followers
        ));
    }

    if metrics.total_engagement == 0 {
        if followers > thresholds.large_audience {
            reasons.push("Large audience but zero engagement on these tweets, dead feed".to_string());
        } else {
            reasons.push("Zero engagement on found tweets, dead audience".to_string());
        }
    } else if metrics.engagement_rate < thresholds.min_engagement_rate {
        reasons.push(format!(
            "Very low ER ({})",
            format_percent(metrics.engagement_rate)
        ));
    }

    if followers < thresholds.min_followers {
        reasons.push(format!("Too small audience for promo ({} followers)", followers));
    }

    reasons
}

fn promo_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)https?://|\b[a-z0-9-]+\.(fi|io|xyz|app|finance)\b")
            .expect("promo link pattern is valid")
    })
}

const PROMO_WORDS: &[&str] = &[
    "check", "try", "new", "launch", "alpha", "gem", "airdrop", "🔥", "💎", "🚀",
];

/// Heuristic: sample tweets carry links or promotional vocabulary
pub fn looks_like_promo(samples: &[SampleTweet]) -> bool {
    if samples.is_empty() {
        return false;
    }
    let joined = samples
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    promo_link_pattern().is_match(&joined) || PROMO_WORDS.iter().any(|w| joined.contains(w))
}
