//! Record database queries.
//!
//! All record kinds share one table; the kind-specific field set is a
//! JSON document in the `fields` column. Every query is scoped by kind
//! so one kind's ids can never resolve a record of another kind.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// Stored record, fields still serialized.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: String,
    pub kind: String,
    pub fields: String,
    pub author_id: String,
    pub modify_date: DateTime<Utc>,
}

/// Stored record joined with its author's display name, for list views.
#[derive(Debug, Clone, FromRow)]
pub struct RecordWithAuthor {
    pub id: String,
    pub kind: String,
    pub fields: String,
    pub author_id: String,
    pub modify_date: DateTime<Utc>,
    pub author_name: Option<String>,
}

/// Input for creating a new record.
#[derive(Debug, Clone)]
pub struct CreateRecord {
    pub id: String,
    pub kind: &'static str,
    pub fields: String,
    pub author_id: String,
    pub modify_date: DateTime<Utc>,
}

// ============================================================================
// Queries
// ============================================================================

/// Insert a new record. The author reference is fixed here and never
/// touched by updates.
pub async fn insert_record(pool: &DbPool, input: CreateRecord) -> Result<RecordRow> {
    sqlx::query_as::<_, RecordRow>(
        r#"
        INSERT INTO records (id, kind, fields, author_id, modify_date)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(input.kind)
    .bind(&input.fields)
    .bind(&input.author_id)
    .bind(input.modify_date)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a record by kind and ID.
pub async fn get_record(pool: &DbPool, kind: &str, id: &str) -> Result<RecordRow> {
    sqlx::query_as::<_, RecordRow>("SELECT * FROM records WHERE kind = ? AND id = ?")
        .bind(kind)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No {} with id {}", kind, id)))
}

/// List all records of a kind, in natural store order.
pub async fn list_records(pool: &DbPool, kind: &str) -> Result<Vec<RecordWithAuthor>> {
    sqlx::query_as::<_, RecordWithAuthor>(
        r#"
        SELECT r.id, r.kind, r.fields, r.author_id, r.modify_date,
               u.display_name AS author_name
        FROM records r
        LEFT JOIN users u ON u.id = r.author_id
        WHERE r.kind = ?
        "#,
    )
    .bind(kind)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Update a record's field document and modify date. The author column
/// is deliberately absent from the statement.
pub async fn update_record(
    pool: &DbPool,
    kind: &str,
    id: &str,
    fields: &str,
    modify_date: DateTime<Utc>,
) -> Result<RecordRow> {
    sqlx::query_as::<_, RecordRow>(
        r#"
        UPDATE records
        SET fields = ?, modify_date = ?
        WHERE kind = ? AND id = ?
        RETURNING *
        "#,
    )
    .bind(fields)
    .bind(modify_date)
    .bind(kind)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("No {} with id {}", kind, id)))
}

/// Delete a record by kind and ID.
pub async fn delete_record(pool: &DbPool, kind: &str, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM records WHERE kind = ? AND id = ?")
        .bind(kind)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::TimeZone;

    async fn test_pool() -> DbPool {
        let pool = db::create_pool_with_config(":memory:", db::PoolConfig::test())
            .await
            .unwrap();
        db::initialize_schema(&pool).await.unwrap();
        pool
    }

    async fn seed_user(pool: &DbPool, email: &str, name: &str) -> db::User {
        db::create_user(
            pool,
            db::CreateUser {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.to_string(),
                display_name: name.to_string(),
                password_hash: "salt$hash".to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn record_input(author: &str, fields: &str, at: DateTime<Utc>) -> CreateRecord {
        CreateRecord {
            id: uuid::Uuid::new_v4().to_string(),
            kind: "dog",
            fields: fields.to_string(),
            author_id: author.to_string(),
            modify_date: at,
        }
    }

    #[tokio::test]
    async fn test_insert_get_roundtrip() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "o@example.com", "Owner").await;

        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let created = insert_record(
            &pool,
            record_input(&user.id, r#"{"name":"Rex","breed":"Lab","age":3}"#, t0),
        )
        .await
        .unwrap();

        let fetched = get_record(&pool, "dog", &created.id).await.unwrap();
        assert_eq!(fetched.fields, created.fields);
        assert_eq!(fetched.author_id, user.id);
        assert_eq!(fetched.modify_date, t0);
    }

    #[tokio::test]
    async fn test_get_is_scoped_by_kind() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "k@example.com", "Owner").await;

        let created = insert_record(
            &pool,
            record_input(&user.id, r#"{"name":"Rex","breed":"Lab","age":3}"#, Utc::now()),
        )
        .await
        .unwrap();

        // Same id under a different kind must not resolve.
        let err = get_record(&pool, "business", &created.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_refreshes_modify_date_and_keeps_author() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "u@example.com", "Owner").await;

        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();

        let created = insert_record(
            &pool,
            record_input(&user.id, r#"{"name":"Rex","breed":"Lab","age":3}"#, t0),
        )
        .await
        .unwrap();

        let updated = update_record(
            &pool,
            "dog",
            &created.id,
            r#"{"name":"Rex","breed":"Lab","age":4}"#,
            t1,
        )
        .await
        .unwrap();

        assert_eq!(updated.modify_date, t1);
        assert_eq!(updated.author_id, user.id);
        assert!(updated.fields.contains("\"age\":4"));
    }

    #[tokio::test]
    async fn test_update_unknown_record_is_not_found() {
        let pool = test_pool().await;
        let err = update_record(&pool, "dog", "missing", "{}", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_in_natural_order_and_delete() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "l@example.com", "Owner").await;

        let first = insert_record(
            &pool,
            record_input(&user.id, r#"{"name":"Ada","breed":"Corgi","age":2}"#, Utc::now()),
        )
        .await
        .unwrap();
        let second = insert_record(
            &pool,
            record_input(&user.id, r#"{"name":"Bo","breed":"Pug","age":5}"#, Utc::now()),
        )
        .await
        .unwrap();

        let listed = list_records(&pool, "dog").await.unwrap();
        assert_eq!(
            listed.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec![first.id.as_str(), second.id.as_str()]
        );
        assert_eq!(listed[0].author_name.as_deref(), Some("Owner"));

        delete_record(&pool, "dog", &first.id).await.unwrap();
        let listed = list_records(&pool, "dog").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second.id);
    }
}
