//! # Domain Entities
//!
//! Core domain entities and the repository traits that load and store them.
//!
//! ## Auth service
//!
//! - **User**: a registered identity (id, login, display name)
//! - **Credential**: the hashed secret proving control of a User
//! - **Group**: named user sets; every user joins the default group
//!
//! ## Chat service
//!
//! - **Chat**: a group conversation with a member list
//! - **Message**: a text message posted to a chat
//!
//! Repository traits are implemented in the infrastructure layer.

mod chat;
mod credential;
mod group;
mod message;
mod user;

pub use chat::{Chat, ChatChanges, ChatRepository};
pub use credential::{Credential, CredentialRepository};
pub use group::{Group, GroupRepository, DEFAULT_GROUP_ID};
pub use message::{Message, MessageChanges, MessageRepository, NewMessage, MAX_MESSAGE_TEXT_LENGTH};
pub use user::{NewUser, User, UserRepository};

#[cfg(test)]
pub use chat::MockChatRepository;
#[cfg(test)]
pub use credential::MockCredentialRepository;
#[cfg(test)]
pub use group::MockGroupRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
#[cfg(test)]
pub use user::MockUserRepository;
