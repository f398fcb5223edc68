//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository and CredentialRepository
//! traits. Identities live in `users`, credentials in `auth`, and the login
//! is only stored on the credential row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    Credential, CredentialRepository, NewUser, User, UserRepository, DEFAULT_GROUP_ID,
};
use crate::infrastructure::database::execute_in_transaction;
use crate::shared::error::AppError;

/// Joined `users` + `auth` row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    login: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            login: self.login,
            username: self.username,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    login: String,
    password_hash: String,
    token: Option<String>,
}

impl CredentialRow {
    fn into_credential(self) -> Credential {
        Credential {
            user_id: self.user_id,
            login: self.login,
            password_hash: self.password_hash,
            cached_token: self.token,
        }
    }
}

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_login_conflict(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Login already taken".to_string())
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, a.login, u.username, u.created_at
            FROM users u
            JOIN auth a ON a.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Insert identity, credential and default-group membership atomically.
    async fn create_with_credential(&self, user: &NewUser) -> Result<User, AppError> {
        let NewUser {
            id,
            login,
            username,
            password_hash,
        } = user.clone();

        execute_in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let created_at: DateTime<Utc> = sqlx::query_scalar(
                    "INSERT INTO users (id, username) VALUES ($1, $2) RETURNING created_at",
                )
                .bind(id)
                .bind(&username)
                .fetch_one(&mut **tx)
                .await?;

                sqlx::query("INSERT INTO auth (user_id, login, password_hash) VALUES ($1, $2, $3)")
                    .bind(id)
                    .bind(&login)
                    .bind(&password_hash)
                    .execute(&mut **tx)
                    .await
                    .map_err(map_login_conflict)?;

                sqlx::query(
                    "INSERT INTO user_group (user_id, group_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(DEFAULT_GROUP_ID)
                .execute(&mut **tx)
                .await?;

                Ok(User {
                    id,
                    login,
                    username,
                    created_at,
                })
            })
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for PgUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, AppError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT user_id, login, password_hash, token FROM auth WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CredentialRow::into_credential))
    }

    async fn login_exists(&self, login: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM auth WHERE login = $1)")
                .bind(login)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
