//! Analyzer module - metrics, classification and ranking

pub mod classifier;
pub mod metrics;
pub mod ranking;

pub use classifier::{classify, looks_like_promo, Verdict};

use crate::config::{EngagementConfig, Thresholds};
use crate::{Assessment, AuthorRecord};

/// Compute metrics for an author and classify them
pub fn assess(
    author: AuthorRecord,
    engagement: &EngagementConfig,
    thresholds: &Thresholds,
) -> Assessment {
    let metrics = metrics::compute(&author, engagement);
    let verdict = classify(&author, &metrics, thresholds);
    Assessment {
        author,
        metrics,
        recommendation: verdict.recommendation,
        reason: verdict.reason,
    }
}
