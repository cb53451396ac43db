//! Database row types. These map directly to SQLite rows and stay
//! independent of the scribe-types wire models.

#[derive(Debug, Clone, PartialEq)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
}

/// Column values for a post write. `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct CommentChanges {
    pub post_id: Option<i64>,
    pub content: Option<String>,
}
