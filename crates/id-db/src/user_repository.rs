//! User store adapter: lookup-by-email and create against SQLite.
//!
//! Uniqueness of the email column is enforced by the store's UNIQUE index,
//! not by application code. A pre-check followed by an insert is racy under
//! concurrent registration, so callers must treat the [`DbError::Duplicate`]
//! returned by `create` as the authoritative conflict signal.

use crate::{DbError, Result as DbErrorResult};

use id_core::User;

use std::panic::Location;

use async_trait::async_trait;
use chrono::DateTime;
use error_location::ErrorLocation;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Narrow store interface the identity service depends on. Any backend
/// with an atomic unique-key constraint can satisfy it.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-sensitive exact match on the email column.
    async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<User>>;

    /// Insert a new user. Fails with [`DbError::Duplicate`] when the email
    /// is already taken, even when a concurrent insert won the race after
    /// the caller's pre-check.
    async fn create(&self, user: &User) -> DbErrorResult<()>;

    /// Connectivity check, used at startup to fail fast.
    async fn ping(&self) -> DbErrorResult<()>;
}

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> DbErrorResult<User> {
        let id: String = row.get("id");
        let created_at: i64 = row.get("created_at");

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
                message: format!("Invalid UUID in users.id: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?,
            email: row.get("email"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
            created_at: DateTime::from_timestamp(created_at, 0).ok_or_else(|| {
                DbError::Initialization {
                    message: "Invalid timestamp in users.created_at".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?,
        })
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(
            r#"
                SELECT id, email, name, password_hash, created_at
                FROM users
                WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create(&self, user: &User) -> DbErrorResult<()> {
        let id = user.id.to_string();
        let created_at = user.created_at.timestamp();

        sqlx::query(
            r#"
                INSERT INTO users (id, email, name, password_hash, created_at)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::Duplicate {
                column: "email",
                location: ErrorLocation::from(Location::caller()),
            },
            _ => DbError::from(e),
        })?;

        Ok(())
    }

    async fn ping(&self) -> DbErrorResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;

        Ok(())
    }
}
