//! CSV reports: influencers.csv (reach) and recommendations.csv (ranked)

use crate::{Assessment, AuthorRecord, Recommendation, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const INFLUENCERS_FILENAME: &str = "influencers.csv";
pub const RECOMMENDATIONS_FILENAME: &str = "recommendations.csv";

/// Sample tweets exported per author
pub const EXPORTED_SAMPLES: usize = 3;

pub const INFLUENCER_COLUMNS: [&str; 11] = [
    "username",
    "name",
    "user_id",
    "verified",
    "followers_count",
    "following_count",
    "tweets_found",
    "total_likes",
    "total_retweets",
    "total_replies",
    "profile_url",
];

pub const RECOMMENDATION_COLUMNS: [&str; 25] = [
    "recommendation",
    "username",
    "name",
    "profile_url",
    "profile_image_url",
    "followers_count",
    "following_count",
    "listed_count",
    "created_at",
    "tweets_found",
    "total_likes",
    "total_retweets",
    "total_replies",
    "total_engagement",
    "engagement_rate",
    "recommendation_reason",
    "sample_tweet_1",
    "sample_tweet_2",
    "sample_tweet_3",
    "tweet_date_1",
    "tweet_date_2",
    "tweet_date_3",
    "tweet_url_1",
    "tweet_url_2",
    "tweet_url_3",
];

/// One line of influencers.csv
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerRow {
    pub username: String,
    pub name: String,
    pub user_id: String,
    pub verified: bool,
    pub followers_count: u64,
    pub following_count: u64,
    pub tweets_found: u32,
    pub total_likes: u64,
    pub total_retweets: u64,
    pub total_replies: u64,
    pub profile_url: String,
}

impl InfluencerRow {
    pub fn from_author(author: &AuthorRecord, profile_base_url: &str) -> Self {
        Self {
            username: author.username.clone(),
            name: author.name.clone(),
            user_id: author.user_id.clone(),
            verified: author.verified,
            followers_count: author.followers_count,
            following_count: author.following_count,
            tweets_found: author.tweets_found,
            total_likes: author.total_likes,
            total_retweets: author.total_retweets,
            total_replies: author.total_replies,
            profile_url: profile_url(profile_base_url, &author.username),
        }
    }
}

/// One line of recommendations.csv.
///
/// Reading is lenient: missing columns and unparsable numbers become defaults,
/// so hand-edited or older files still render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationRow {
    #[serde(deserialize_with = "lenient_recommendation")]
    pub recommendation: Recommendation,
    pub username: String,
    pub name: String,
    pub profile_url: String,
    pub profile_image_url: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub followers_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub following_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub listed_count: u64,
    pub created_at: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub tweets_found: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_likes: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_retweets: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_replies: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_engagement: u64,
    #[serde(serialize_with = "six_decimals", deserialize_with = "lenient_f64")]
    pub engagement_rate: f64,
    pub recommendation_reason: String,
    pub sample_tweet_1: String,
    pub sample_tweet_2: String,
    pub sample_tweet_3: String,
    pub tweet_date_1: String,
    pub tweet_date_2: String,
    pub tweet_date_3: String,
    pub tweet_url_1: String,
    pub tweet_url_2: String,
    pub tweet_url_3: String,
}

impl RecommendationRow {
    pub fn from_assessment(assessment: &Assessment, profile_base_url: &str) -> Self {
        let author = &assessment.author;
        let sample = |i: usize| author.samples.get(i);
        let text = |i: usize| sample(i).map(|s| s.text.clone()).unwrap_or_default();
        let date = |i: usize| {
            sample(i)
                .and_then(|s| s.created_at.clone())
                .unwrap_or_default()
        };
        let url = |i: usize| {
            sample(i)
                .and_then(|s| s.id.as_deref())
                .map(|id| tweet_url(profile_base_url, &author.username, id))
                .unwrap_or_default()
        };

        Self {
            recommendation: assessment.recommendation,
            username: author.username.clone(),
            name: author.name.clone(),
            profile_url: profile_url(profile_base_url, &author.username),
            profile_image_url: author.profile_image_url.clone(),
            followers_count: author.followers_count,
            following_count: author.following_count,
            listed_count: author.listed_count,
            created_at: author.created_at.clone(),
            tweets_found: author.tweets_found as u64,
            total_likes: author.total_likes,
            total_retweets: author.total_retweets,
            total_replies: author.total_replies,
            total_engagement: assessment.metrics.total_engagement,
            engagement_rate: assessment.metrics.engagement_rate,
            recommendation_reason: assessment.reason.clone(),
            sample_tweet_1: text(0),
            sample_tweet_2: text(1),
            sample_tweet_3: text(2),
            tweet_date_1: date(0),
            tweet_date_2: date(1),
            tweet_date_3: date(2),
            tweet_url_1: url(0),
            tweet_url_2: url(1),
            tweet_url_3: url(2),
        }
    }

    /// (sample text, tweet date, tweet url) for the exported samples
    pub fn samples(&self) -> [(&str, &str, &str); EXPORTED_SAMPLES] {
        [
            (&self.sample_tweet_1, &self.tweet_date_1, &self.tweet_url_1),
            (&self.sample_tweet_2, &self.tweet_date_2, &self.tweet_url_2),
            (&self.sample_tweet_3, &self.tweet_date_3, &self.tweet_url_3),
        ]
    }
}

pub fn profile_url(base: &str, username: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), username)
}

pub fn tweet_url(base: &str, username: &str, tweet_id: &str) -> String {
    format!("{}/status/{}", profile_url(base, username), tweet_id)
}

/// Write rows with a header line, even when there are no rows
fn write_with_header<W: Write, T: Serialize>(writer: W, columns: &[&str], rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_influencers_to<W: Write>(writer: W, rows: &[InfluencerRow]) -> Result<()> {
    write_with_header(writer, &INFLUENCER_COLUMNS, rows)
}

pub fn write_influencers(path: &Path, rows: &[InfluencerRow]) -> Result<()> {
    write_influencers_to(File::create(path)?, rows)
}

pub fn write_recommendations_to<W: Write>(writer: W, rows: &[RecommendationRow]) -> Result<()> {
    write_with_header(writer, &RECOMMENDATION_COLUMNS, rows)
}

pub fn write_recommendations(path: &Path, rows: &[RecommendationRow]) -> Result<()> {
    write_recommendations_to(File::create(path)?, rows)
}

pub fn read_recommendations_from<R: Read>(reader: R) -> Result<Vec<RecommendationRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn read_recommendations(path: &Path) -> Result<Vec<RecommendationRow>> {
    read_recommendations_from(File::open(path)?)
}

fn six_decimals<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.6}", value))
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(0))
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0))
}

fn lenient_recommendation<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Recommendation, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Recommendation::from_label(&raw))
}
