use crate::models::{CommentChanges, CommentRow, PostChanges, PostRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, Row};

const POST_COLUMNS: &str = "id, title, content, author, created_at";
const COMMENT_COLUMNS: &str = "id, post_id, content";

impl Database {
    // -- Posts --

    pub fn list_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id"))?;
            let rows = stmt
                .query_map([], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| query_post(conn, id))
    }

    pub fn post_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT 1 FROM posts WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn insert_post(&self, title: &str, content: &str, author: &str) -> Result<PostRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (title, content, author) VALUES (?1, ?2, ?3)",
                (title, content, author),
            )?;
            let id = conn.last_insert_rowid();
            query_post(conn, id)?.ok_or_else(|| anyhow::anyhow!("Post {} vanished after insert", id))
        })
    }

    /// Apply `changes` to post `id`. Returns the updated row, or `None` when
    /// no post has that id.
    pub fn update_post(&self, id: i64, changes: &PostChanges) -> Result<Option<PostRow>> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE posts SET
                    title   = COALESCE(?2, title),
                    content = COALESCE(?3, content),
                    author  = COALESCE(?4, author)
                 WHERE id = ?1",
                rusqlite::params![id, changes.title, changes.content, changes.author],
            )?;
            if updated == 0 {
                return Ok(None);
            }
            query_post(conn, id)
        })
    }

    /// Delete a post and, through the cascade, its comments.
    /// Returns false when no post has that id.
    pub fn delete_post(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Comments --

    pub fn list_comments(&self) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COMMENT_COLUMNS} FROM comments ORDER BY id"))?;
            let rows = stmt
                .query_map([], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_comment(&self, id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| query_comment(conn, id))
    }

    pub fn insert_comment(&self, post_id: i64, content: &str) -> Result<CommentRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO comments (post_id, content) VALUES (?1, ?2)",
                rusqlite::params![post_id, content],
            )?;
            let id = conn.last_insert_rowid();
            query_comment(conn, id)?
                .ok_or_else(|| anyhow::anyhow!("Comment {} vanished after insert", id))
        })
    }

    pub fn update_comment(&self, id: i64, changes: &CommentChanges) -> Result<Option<CommentRow>> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE comments SET
                    post_id = COALESCE(?2, post_id),
                    content = COALESCE(?3, content)
                 WHERE id = ?1",
                rusqlite::params![id, changes.post_id, changes.content],
            )?;
            if updated == 0 {
                return Ok(None);
            }
            query_comment(conn, id)
        })
    }

    pub fn delete_comment(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        content: row.get(2)?,
    })
}

fn query_post(conn: &Connection, id: i64) -> Result<Option<PostRow>> {
    conn.query_row(
        &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
        [id],
        post_from_row,
    )
    .optional()
}

fn query_comment(conn: &Connection, id: i64) -> Result<Option<CommentRow>> {
    conn.query_row(
        &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
        [id],
        comment_from_row,
    )
    .optional()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
