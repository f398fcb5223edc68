//! Message Repository Implementation
//!
//! PostgreSQL implementation of message operations with offset pagination
//! and author-scoped bulk delete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Message, MessageChanges, MessageRepository, NewMessage};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Creates a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    chat_id: Uuid,
    user_id: Uuid,
    text: String,
    content: Option<String>,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            chat_id: self.chat_id,
            user_id: self.user_id,
            text: self.text,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    /// Newest first; ties on `created_at` fall back to id order.
    async fn list(&self, chat_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, user_id, text, content, created_at
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }

    async fn find(&self, chat_id: Uuid, id: i64) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, user_id, text, content, created_at
            FROM messages
            WHERE chat_id = $1 AND id = $2
            "#,
        )
        .bind(chat_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MessageRow::into_message))
    }

    async fn create(&self, message: &NewMessage) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (chat_id, user_id, text, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, chat_id, user_id, text, content, created_at
            "#,
        )
        .bind(message.chat_id)
        .bind(message.user_id)
        .bind(&message.text)
        .bind(&message.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    /// Absent fields keep their stored value.
    async fn update(
        &self,
        chat_id: Uuid,
        id: i64,
        changes: &MessageChanges,
    ) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            UPDATE messages
            SET text = COALESCE($3, text), content = COALESCE($4, content)
            WHERE chat_id = $1 AND id = $2
            RETURNING id, chat_id, user_id, text, content, created_at
            "#,
        )
        .bind(chat_id)
        .bind(id)
        .bind(&changes.text)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MessageRow::into_message))
    }

    async fn delete_many(&self, chat_id: Uuid, author: Uuid, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM messages
            WHERE chat_id = $1 AND user_id = $2 AND id = ANY($3)
            "#,
        )
        .bind(chat_id)
        .bind(author)
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
