//! Transaction helper
//!
//! Groups several statements into one atomic unit. The closure either
//! returns `Ok` and the transaction commits, or returns `Err` and the
//! transaction is dropped, which rolls it back.

use std::future::Future;
use std::pin::Pin;

use sqlx::{PgPool, Postgres, Transaction};

use crate::shared::error::AppError;

/// Boxed future borrowing the transaction for `'c`.
pub type TxFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'c>>;

/// Execute a closure within a transaction.
///
/// # Example
/// ```ignore
/// let chat = execute_in_transaction(&pool, move |tx| Box::pin(async move {
///     sqlx::query("INSERT INTO chats ...").execute(&mut **tx).await?;
///     sqlx::query("INSERT INTO chat_members ...").execute(&mut **tx).await?;
///     Ok(chat)
/// })).await?;
/// ```
pub async fn execute_in_transaction<F, T>(pool: &PgPool, f: F) -> Result<T, AppError>
where
    F: for<'c> FnOnce(&'c mut Transaction<'static, Postgres>) -> TxFuture<'c, T>,
{
    let mut tx = pool.begin().await?;
    let result = f(&mut tx).await?;
    tx.commit().await?;
    Ok(result)
}
