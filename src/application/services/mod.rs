//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **TokenService**: JWT issuance and verification
//! - **AuthService**: Registration and login
//! - **UserService**: User lookup and account deletion
//! - **ChatService**: Chat lifecycle and membership
//! - **MessageService**: Message CRUD operations

pub mod auth_service;
pub mod chat_service;
pub mod message_service;
pub mod token_service;
pub mod user_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, LoginOutcome, Registration};
pub use chat_service::{ChatError, ChatService, ChatServiceImpl, CreateChatDto};
pub use message_service::{
    CreateMessageDto, MessageError, MessageQueryDto, MessageService, MessageServiceImpl,
};
pub use token_service::{Claims, IssuedToken, TokenError, TokenIssuer, TokenVerifier};
pub use user_service::{UserDto, UserError, UserService, UserServiceImpl};
