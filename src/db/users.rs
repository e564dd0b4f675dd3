//! User and session database queries.
//!
//! Handles registered users and the server-side web sessions backing
//! the session cookie.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// User record from the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

/// Web session record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Input for creating a session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// User Queries
// ============================================================================

/// Create a new user.
pub async fn create_user(pool: &DbPool, input: CreateUser) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, display_name, password_hash, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.email)
    .bind(&input.display_name)
    .bind(&input.password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            Error::AlreadyExists(format!("User with email {} already exists", input.email))
        }
        _ => Error::Database(e),
    })
}

/// Get a user by ID.
pub async fn get_user(pool: &DbPool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User not found: {}", id)))
}

/// Get a user by email.
/// Uses idx_users_email index.
pub async fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

// ============================================================================
// Session Queries
// ============================================================================

/// Create a new session.
pub async fn create_session(pool: &DbPool, input: CreateSession) -> Result<Session> {
    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.user_id)
    .bind(input.expires_at)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a session by ID.
pub async fn get_session(pool: &DbPool, id: &str) -> Result<Option<Session>> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// Delete a session (logout or expiry cleanup).
pub async fn delete_session(pool: &DbPool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Push a session's expiry forward.
pub async fn extend_session(pool: &DbPool, id: &str, expires_at: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
        .bind(expires_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::Duration;

    async fn test_pool() -> DbPool {
        let pool = db::create_pool_with_config(":memory:", db::PoolConfig::test())
            .await
            .unwrap();
        db::initialize_schema(&pool).await.unwrap();
        pool
    }

    fn sample_user(email: &str) -> CreateUser {
        CreateUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: "Sample".to_string(),
            password_hash: "salt$deadbeef".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = test_pool().await;

        let created = create_user(&pool, sample_user("a@example.com")).await.unwrap();
        let fetched = get_user(&pool, &created.id).await.unwrap();
        assert_eq!(fetched.email, "a@example.com");

        let by_email = get_user_by_email(&pool, "a@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = test_pool().await;

        create_user(&pool, sample_user("dup@example.com")).await.unwrap();
        let err = create_user(&pool, sample_user("dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let pool = test_pool().await;
        let err = get_user(&pool, "missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let pool = test_pool().await;
        let user = create_user(&pool, sample_user("s@example.com")).await.unwrap();

        let session = create_session(
            &pool,
            CreateSession {
                id: nanoid::nanoid!(),
                user_id: user.id.clone(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        )
        .await
        .unwrap();
        assert!(!session.is_expired());

        let fetched = get_session(&pool, &session.id).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, user.id);

        delete_session(&pool, &session.id).await.unwrap();
        assert!(get_session(&pool, &session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_detected() {
        let pool = test_pool().await;
        let user = create_user(&pool, sample_user("e@example.com")).await.unwrap();

        let session = create_session(
            &pool,
            CreateSession {
                id: nanoid::nanoid!(),
                user_id: user.id,
                expires_at: Utc::now() - Duration::hours(1),
            },
        )
        .await
        .unwrap();
        assert!(session.is_expired());
    }
}
