//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUser, Role, User, UserChanges};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, bio, role, \
                            confirmation_key, password_hash, created_at";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    bio: String,
    role: String,
    confirmation_key: String,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|e: String| {
            AppError::internal("Corrupt user record", json!({"id": row.id, "reason": e}))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            role,
            confirmation_key: row.confirmation_key,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL repository for user accounts.
///
/// Email lookups go through the `lower(email)` unique index.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, clause: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {clause}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, bio, role, confirmation_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.bio)
            .bind(new_user.role.as_str())
            .bind(&new_user.confirmation_key)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.fetch_one_where("username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.fetch_one_where("lower(email) = lower($1)", email).await
    }

    async fn list(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64), AppError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::TEXT IS NULL OR username ILIKE '%' || $1 || '%')
            ORDER BY username
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR username ILIKE '%' || $1 || '%')",
        )
        .bind(&search)
        .fetch_one(self.pool.as_ref())
        .await?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, AppError> {
        let sql = format!(
            r#"
            UPDATE users SET
                username   = COALESCE($2, username),
                email      = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name  = COALESCE($5, last_name),
                bio        = COALESCE($6, bio),
                role       = COALESCE($7, role)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(changes.username)
            .bind(changes.email)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.bio)
            .bind(changes.role.map(|r| r.as_str()))
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({"id": id})))?;

        row.try_into()
    }

    async fn set_confirmation_key(
        &self,
        id: i64,
        confirmation_key: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET confirmation_key = $2 WHERE id = $1")
            .bind(id)
            .bind(confirmation_key)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found", json!({"id": id})));
        }

        Ok(())
    }

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found", json!({"id": id})));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found", json!({"id": id})));
        }

        Ok(())
    }
}
