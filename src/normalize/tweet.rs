use serde::Deserialize;
use serde_json::Value;

/// One raw tweet object, as collected — one of these per input line.
///
/// Fields the output row cannot exist without are required here, so a record
/// missing one fails deserialization with a "missing field" error naming it.
/// Everything that is legitimately absent in the source carries an explicit
/// `Option` or defaults to empty.
#[derive(Debug, Deserialize)]
pub struct Tweet {
    pub id_str: String,
    pub created_at: String,
    pub text: String,
    pub entities: Entities,
    #[serde(default)]
    pub in_reply_to_status_id: Option<i64>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<i64>,
    pub retweet_count: i64,
    pub user: User,
    /// Free-form geo object; kept verbatim since we only ever reprint it.
    #[serde(default)]
    pub coordinates: Option<Value>,
}

/// The nested container holding hashtag/URL/mention sub-lists.
#[derive(Debug, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<Hashtag>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub user_mentions: Vec<UserMention>,
}

#[derive(Debug, Deserialize)]
pub struct Hashtag {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UrlEntity {
    pub expanded_url: String,
}

#[derive(Debug, Deserialize)]
pub struct UserMention {
    pub screen_name: String,
}

/// Author attributes extracted per record.
#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub screen_name: String,
    pub created_at: String,
}
