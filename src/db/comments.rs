//! Comment database queries.
//!
//! Comments reference exactly one parent record. The web layer only
//! reads them; insertion lives here for the surfaces that create them.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// Comment record from the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub kind: String,
    pub record_id: String,
    pub author_id: String,
    pub content: String,
    pub create_date: DateTime<Utc>,
}

/// Comment joined with its author's display name, for detail views.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    pub id: String,
    pub content: String,
    pub create_date: DateTime<Utc>,
    pub author_name: Option<String>,
}

/// Input for creating a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub id: String,
    pub kind: &'static str,
    pub record_id: String,
    pub author_id: String,
    pub content: String,
}

// ============================================================================
// Queries
// ============================================================================

/// Insert a new comment under a record.
pub async fn insert_comment(pool: &DbPool, input: CreateComment) -> Result<Comment> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, kind, record_id, author_id, content, create_date)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(input.kind)
    .bind(&input.record_id)
    .bind(&input.author_id)
    .bind(&input.content)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// List the comments attached to one record, oldest first.
pub async fn list_comments_for_record(
    pool: &DbPool,
    kind: &str,
    record_id: &str,
) -> Result<Vec<CommentWithAuthor>> {
    sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.content, c.create_date, u.display_name AS author_name
        FROM comments c
        LEFT JOIN users u ON u.id = c.author_id
        WHERE c.kind = ? AND c.record_id = ?
        ORDER BY c.create_date ASC
        "#,
    )
    .bind(kind)
    .bind(record_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}
