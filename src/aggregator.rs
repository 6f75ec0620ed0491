//! Fold matched tweets into one record per author

use crate::search::{Tweet, User};
use crate::{truncate_chars, AuthorRecord, SampleTweet, MAX_SAMPLE_CHARS};
use std::collections::{HashMap, HashSet};

/// Author records in first-seen order, keyed by user id
#[derive(Debug, Default)]
pub struct AuthorTable {
    records: Vec<AuthorRecord>,
    index: HashMap<String, usize>,
    seen_tweets: HashSet<String>,
    sample_limit: usize,
    /// Tweets dropped for lacking an author id or user expansion
    skipped: usize,
}

impl AuthorTable {
    pub fn new(sample_limit: usize) -> Self {
        Self {
            sample_limit,
            ..Self::default()
        }
    }

    /// Build a table from all tweets and the users they reference
    pub fn build(tweets: &[Tweet], users: &HashMap<String, User>, sample_limit: usize) -> Self {
        let mut table = Self::new(sample_limit);
        for tweet in tweets {
            table.add_tweet(tweet, users);
        }
        table
    }

    /// Account for one tweet. Returns false when the tweet was not counted.
    pub fn add_tweet(&mut self, tweet: &Tweet, users: &HashMap<String, User>) -> bool {
        let Some(author_id) = tweet.author_id.as_deref().filter(|id| !id.is_empty()) else {
            self.skipped += 1;
            return false;
        };
        let Some(user) = users.get(author_id) else {
            log::debug!("No user expansion for author {}", author_id);
            self.skipped += 1;
            return false;
        };

        // The same tweet can match more than one query
        if let Some(ref id) = tweet.id {
            if !self.seen_tweets.insert(id.clone()) {
                return false;
            }
        }

        let idx = match self.index.get(author_id) {
            Some(&idx) => idx,
            None => {
                self.records.push(new_record(user));
                self.index.insert(author_id.to_string(), self.records.len() - 1);
                self.records.len() - 1
            }
        };
        let sample_limit = self.sample_limit;
        let record = &mut self.records[idx];

        record.tweets_found = record.tweets_found.saturating_add(1);
        let metrics = tweet.public_metrics.unwrap_or_default();
        record.total_likes = record.total_likes.saturating_add(metrics.like_count);
        record.total_retweets = record.total_retweets.saturating_add(metrics.retweet_count);
        record.total_replies = record.total_replies.saturating_add(metrics.reply_count);

        let text = tweet.text.as_deref().unwrap_or("").trim();
        if !text.is_empty() && record.samples.len() < sample_limit {
            record.samples.push(SampleTweet {
                id: tweet.id.clone(),
                text: truncate_chars(text, MAX_SAMPLE_CHARS).to_string(),
                created_at: tweet.created_at.clone().filter(|d| !d.is_empty()),
            });
        }
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn records(&self) -> &[AuthorRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AuthorRecord> {
        self.records
    }
}

fn new_record(user: &User) -> AuthorRecord {
    let metrics = user.public_metrics.unwrap_or_default();
    AuthorRecord {
        user_id: user.id.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        verified: user.verified,
        followers_count: metrics.followers_count,
        following_count: metrics.following_count,
        listed_count: metrics.listed_count,
        created_at: user.created_at.clone().unwrap_or_default(),
        profile_image_url: user.profile_image_url.clone().unwrap_or_default(),
        ..AuthorRecord::default()
    }
}
