//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - identities and credentials (auth service)
//! - **PgGroupRepository** - group memberships (auth service)
//! - **PgChatRepository** - chats and chat members (chat service)
//! - **PgMessageRepository** - chat messages (chat service)
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgChatRepository, PgMessageRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let chat_repo = PgChatRepository::new(pool.clone());
//!     let message_repo = PgMessageRepository::new(pool);
//! }
//! ```

pub mod chat_repository;
pub mod group_repository;
pub mod message_repository;
pub mod user_repository;

pub use chat_repository::PgChatRepository;
pub use group_repository::PgGroupRepository;
pub use message_repository::PgMessageRepository;
pub use user_repository::PgUserRepository;
