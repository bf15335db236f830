use serde::Serialize;

use crate::normalize::text::scrub_format_destroyers;
use crate::normalize::tweet::{Entities, Tweet};

/// One normalized output row. The serde renames are the output header names,
/// so the CSV writer derives both header and cells from this one definition.
/// `None` cells serialize as empty fields.
#[derive(Debug, Serialize)]
pub struct TweetRow {
    #[serde(rename = "Tweet Id")]
    pub tweet_id: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Hashtags")]
    pub hashtags: Option<String>,
    #[serde(rename = "URLS")]
    pub urls: Option<String>,
    #[serde(rename = "User Mentions")]
    pub user_mentions: Option<String>,
    #[serde(rename = "In Reply To Tweet ID")]
    pub in_reply_to_tweet_id: Option<i64>,
    #[serde(rename = "In Reply to User")]
    pub in_reply_to_user: Option<i64>,
    #[serde(rename = "Retweet_Count")]
    pub retweet_count: i64,
    #[serde(rename = "Screen Name")]
    pub screen_name: String,
    #[serde(rename = "User Id")]
    pub user_id: i64,
    #[serde(rename = "Joined Twitter")]
    pub joined_twitter: String,
    #[serde(rename = "Coordinates")]
    pub coordinates: String,
    #[serde(rename = "Original Tweet")]
    pub original_tweet: String,
}

/// Comma-join the hashtags as "#tag" items; empty list yields an empty cell.
fn hashtag_text(entities: &Entities) -> Option<String> {
    if entities.hashtags.is_empty() {
        return None;
    }
    let tags: Vec<String> = entities
        .hashtags
        .iter()
        .map(|ht| format!("#{}", ht.text))
        .collect();
    Some(tags.join(", "))
}

/// Comma-join the expanded URLs; empty list yields an empty cell.
fn extract_urls(entities: &Entities) -> Option<String> {
    if entities.urls.is_empty() {
        return None;
    }
    let links: Vec<&str> = entities
        .urls
        .iter()
        .map(|u| u.expanded_url.as_str())
        .collect();
    Some(links.join(", "))
}

/// Comma-join the mentions as "@handle" items; empty list yields an empty cell.
fn extract_user_mentions(entities: &Entities) -> Option<String> {
    if entities.user_mentions.is_empty() {
        return None;
    }
    let handles: Vec<String> = entities
        .user_mentions
        .iter()
        .map(|um| format!("@{}", um.screen_name))
        .collect();
    Some(handles.join(", "))
}

impl TweetRow {
    /// Map one raw tweet onto the fixed output schema.
    pub fn from_tweet(tweet: &Tweet) -> Self {
        let tweet_id = tweet.id_str.clone();
        let screen_name = tweet.user.screen_name.clone();

        // Absent coordinates become the literal empty list; present ones are
        // the raw value wrapped in one set of brackets.
        let coordinates = match &tweet.coordinates {
            Some(value) => format!("[{}]", value),
            None => "[]".to_string(),
        };

        // Built from the row's own Tweet Id and Screen Name, after both are
        // populated.
        let original_tweet = format!(
            "http://twitter.com/{}/statuses/{}",
            screen_name, tweet_id
        );

        TweetRow {
            tweet_id,
            timestamp: format!("{} UTC", tweet.created_at),
            text: scrub_format_destroyers(&tweet.text),
            hashtags: hashtag_text(&tweet.entities),
            urls: extract_urls(&tweet.entities),
            user_mentions: extract_user_mentions(&tweet.entities),
            in_reply_to_tweet_id: tweet.in_reply_to_status_id,
            in_reply_to_user: tweet.in_reply_to_user_id,
            retweet_count: tweet.retweet_count,
            screen_name,
            user_id: tweet.user.id,
            joined_twitter: tweet.user.created_at.clone(),
            coordinates,
            original_tweet,
        }
    }
}
