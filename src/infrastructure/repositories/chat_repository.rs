//! Chat Repository Implementation
//!
//! PostgreSQL implementation of chats and their `user_chat` membership rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Chat, ChatChanges, ChatRepository};
use crate::infrastructure::database::execute_in_transaction;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ChatRow {
    id: Uuid,
    name: String,
    pic: Option<String>,
    created_at: DateTime<Utc>,
}

impl ChatRow {
    fn into_chat(self) -> Chat {
        Chat {
            id: self.id,
            name: self.name,
            pic: self.pic,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL chat repository implementation.
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, AppError> {
        let rows = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT c.id, c.name, c.pic, c.created_at
            FROM chats c
            JOIN user_chat uc ON uc.chat_id = c.id
            WHERE uc.user_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ChatRow::into_chat).collect())
    }

    /// Insert the chat and its creator's membership in one transaction.
    async fn create_with_member(&self, chat: &Chat, creator: Uuid) -> Result<Chat, AppError> {
        let Chat { id, name, pic, .. } = chat.clone();

        execute_in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let row = sqlx::query_as::<_, ChatRow>(
                    r#"
                    INSERT INTO chats (id, name, pic)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, pic, created_at
                    "#,
                )
                .bind(id)
                .bind(&name)
                .bind(&pic)
                .fetch_one(&mut **tx)
                .await?;

                sqlx::query("INSERT INTO user_chat (user_id, chat_id) VALUES ($1, $2)")
                    .bind(creator)
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;

                Ok(row.into_chat())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(
            "SELECT id, name, pic, created_at FROM chats WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ChatRow::into_chat))
    }

    async fn update(&self, id: Uuid, changes: &ChatChanges) -> Result<Option<Chat>, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            UPDATE chats
            SET name = COALESCE($2, name), pic = COALESCE($3, pic)
            WHERE id = $1
            RETURNING id, name, pic, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.pic)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ChatRow::into_chat))
    }

    /// Members and messages go with the chat via `ON DELETE CASCADE`.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_chat WHERE chat_id = $1 AND user_id = $2)",
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn members(&self, chat_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM user_chat WHERE chat_id = $1 ORDER BY user_id",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Existing members are skipped; returns how many rows were inserted.
    async fn add_members(&self, chat_id: Uuid, user_ids: &[Uuid]) -> Result<u64, AppError> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO user_chat (user_id, chat_id)
            SELECT member, $2 FROM UNNEST($1::uuid[]) AS member
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_ids)
        .bind(chat_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn remove_members(&self, chat_id: Uuid, user_ids: &[Uuid]) -> Result<u64, AppError> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM user_chat WHERE chat_id = $1 AND user_id = ANY($2)")
            .bind(chat_id)
            .bind(user_ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
