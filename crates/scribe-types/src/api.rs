use serde::{Deserialize, Serialize};

// -- Posts --

/// Writable post fields. Every field is optional on the wire so that handlers
/// can report missing fields per name, and so the same body serves create,
/// full update and partial update.
#[derive(Debug, Default, Deserialize)]
pub struct PostFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

// -- Comments --

/// A related record's id as clients send it: a JSON integer, a numeric
/// string such as `"7"`, or something else that handlers reject per field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Id(i64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentFields {
    #[serde(default)]
    pub post: Option<PrimaryKey>,
    #[serde(default)]
    pub content: Option<String>,
}

// -- Generation --

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

// -- Errors --

/// Body returned by the generation endpoint on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body returned by the CRUD surface for not-found and unparseable requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

// -- Index --

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiRoot {
    pub posts: String,
    pub comments: String,
}
