//! Common Test Utilities
//!
//! In-memory repositories, router builders and request helpers.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use chrono::Utc;
use fake::faker::internet::en::{Password, Username};
use fake::Fake;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use chat_auth::application::services::{
    AuthServiceImpl, ChatServiceImpl, MessageServiceImpl, TokenIssuer, TokenVerifier,
    UserServiceImpl,
};
use chat_auth::config::JwtSettings;
use chat_auth::domain::{
    Chat, ChatChanges, ChatRepository, Credential, CredentialRepository, GroupRepository,
    Message, MessageChanges, MessageRepository, NewMessage, NewUser, User, UserRepository,
    DEFAULT_GROUP_ID,
};
use chat_auth::presentation::http::{auth_router, chat_router};
use chat_auth::shared::error::AppError;
use chat_auth::startup::{AuthState, ChatState};

pub const TEST_SECRET: &str = "integration-test-secret-that-is-32-bytes-plus";

pub fn jwt_settings(secret: &str) -> JwtSettings {
    JwtSettings {
        secret: secret.into(),
        token_expiry_hours: 24,
    }
}

// ---------------------------------------------------------------------------
// In-memory auth store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct AuthData {
    users: HashMap<Uuid, User>,
    credentials: HashMap<String, Credential>,
    memberships: HashMap<Uuid, Vec<Uuid>>,
}

/// Auth store with the same uniqueness and atomicity guarantees as Postgres.
#[derive(Default)]
pub struct InMemoryAuthStore {
    data: Mutex<AuthData>,
    stale_login_check: bool,
}

impl InMemoryAuthStore {
    /// Store whose `login_exists` always answers `false`, as if a concurrent
    /// registration committed right after the check. Only the insert itself
    /// can then detect the duplicate.
    pub fn with_stale_login_check() -> Self {
        Self {
            stale_login_check: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryAuthStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.data.lock().unwrap().users.get(&id).cloned())
    }

    async fn create_with_credential(&self, user: &NewUser) -> Result<User, AppError> {
        let mut data = self.data.lock().unwrap();
        if data.credentials.contains_key(&user.login) {
            return Err(AppError::Conflict("Login already taken".into()));
        }

        let created = User {
            id: user.id,
            login: user.login.clone(),
            username: user.username.clone(),
            created_at: Utc::now(),
        };
        data.users.insert(user.id, created.clone());
        data.credentials.insert(
            user.login.clone(),
            Credential {
                user_id: user.id,
                login: user.login.clone(),
                password_hash: user.password_hash.clone(),
                cached_token: None,
            },
        );
        data.memberships.insert(user.id, vec![DEFAULT_GROUP_ID]);
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut data = self.data.lock().unwrap();
        let user = data
            .users
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        data.credentials.remove(&user.login);
        data.memberships.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryAuthStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, AppError> {
        Ok(self.data.lock().unwrap().credentials.get(login).cloned())
    }

    async fn login_exists(&self, login: &str) -> Result<bool, AppError> {
        if self.stale_login_check {
            return Ok(false);
        }
        Ok(self.data.lock().unwrap().credentials.contains_key(login))
    }
}

#[async_trait]
impl GroupRepository for InMemoryAuthStore {
    async fn group_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .memberships
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// In-memory chat store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ChatData {
    chats: HashMap<Uuid, Chat>,
    members: HashSet<(Uuid, Uuid)>,
    messages: Vec<Message>,
    next_message_id: i64,
}

#[derive(Default)]
pub struct InMemoryChatStore {
    data: Mutex<ChatData>,
}

#[async_trait]
impl ChatRepository for InMemoryChatStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, AppError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .chats
            .values()
            .filter(|c| data.members.contains(&(c.id, user_id)))
            .cloned()
            .collect())
    }

    async fn create_with_member(&self, chat: &Chat, creator: Uuid) -> Result<Chat, AppError> {
        let mut data = self.data.lock().unwrap();
        data.chats.insert(chat.id, chat.clone());
        data.members.insert((chat.id, creator));
        Ok(chat.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, AppError> {
        Ok(self.data.lock().unwrap().chats.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: &ChatChanges) -> Result<Option<Chat>, AppError> {
        let mut data = self.data.lock().unwrap();
        Ok(data.chats.get_mut(&id).map(|chat| {
            if let Some(name) = &changes.name {
                chat.name = name.clone();
            }
            if let Some(pic) = &changes.pic {
                chat.pic = Some(pic.clone());
            }
            chat.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.data.lock().unwrap();
        let existed = data.chats.remove(&id).is_some();
        data.members.retain(|(chat_id, _)| *chat_id != id);
        data.messages.retain(|m| m.chat_id != id);
        Ok(existed)
    }

    async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        Ok(self.data.lock().unwrap().members.contains(&(chat_id, user_id)))
    }

    async fn members(&self, chat_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let data = self.data.lock().unwrap();
        let mut members: Vec<Uuid> = data
            .members
            .iter()
            .filter(|(c, _)| *c == chat_id)
            .map(|(_, u)| *u)
            .collect();
        members.sort();
        Ok(members)
    }

    async fn add_members(&self, chat_id: Uuid, user_ids: &[Uuid]) -> Result<u64, AppError> {
        let mut data = self.data.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter(|u| data.members.insert((chat_id, **u)))
            .count() as u64)
    }

    async fn remove_members(&self, chat_id: Uuid, user_ids: &[Uuid]) -> Result<u64, AppError> {
        let mut data = self.data.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter(|u| data.members.remove(&(chat_id, **u)))
            .count() as u64)
    }
}

#[async_trait]
impl MessageRepository for InMemoryChatStore {
    async fn list(&self, chat_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Message>, AppError> {
        let data = self.data.lock().unwrap();
        let mut messages: Vec<Message> = data
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(messages
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find(&self, chat_id: Uuid, id: i64) -> Result<Option<Message>, AppError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .messages
            .iter()
            .find(|m| m.chat_id == chat_id && m.id == id)
            .cloned())
    }

    async fn create(&self, message: &NewMessage) -> Result<Message, AppError> {
        let mut data = self.data.lock().unwrap();
        data.next_message_id += 1;
        let created = Message {
            id: data.next_message_id,
            chat_id: message.chat_id,
            user_id: message.user_id,
            text: message.text.clone(),
            content: message.content.clone(),
            created_at: Utc::now(),
        };
        data.messages.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        chat_id: Uuid,
        id: i64,
        changes: &MessageChanges,
    ) -> Result<Option<Message>, AppError> {
        let mut data = self.data.lock().unwrap();
        Ok(data
            .messages
            .iter_mut()
            .find(|m| m.chat_id == chat_id && m.id == id)
            .map(|m| {
                if let Some(text) = &changes.text {
                    m.text = text.clone();
                }
                if let Some(content) = &changes.content {
                    m.content = Some(content.clone());
                }
                m.clone()
            }))
    }

    async fn delete_many(&self, chat_id: Uuid, author: Uuid, ids: &[i64]) -> Result<u64, AppError> {
        let mut data = self.data.lock().unwrap();
        let before = data.messages.len();
        data.messages
            .retain(|m| !(m.chat_id == chat_id && m.user_id == author && ids.contains(&m.id)));
        Ok((before - data.messages.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// Router wired to in-memory stores, plus an issuer for minting tokens.
pub struct TestApp {
    pub router: Router,
    pub issuer: TokenIssuer,
}

impl TestApp {
    /// Auth service backed by a fresh in-memory store
    pub fn auth() -> Self {
        Self::auth_with_store(InMemoryAuthStore::default())
    }

    /// Auth service backed by the given store
    pub fn auth_with_store(store: InMemoryAuthStore) -> Self {
        let settings = jwt_settings(TEST_SECRET);
        let store = Arc::new(store);
        let issuer = TokenIssuer::new(&settings);

        let state = AuthState {
            auth: Arc::new(AuthServiceImpl::new(
                store.clone(),
                store.clone(),
                store.clone(),
                Arc::new(issuer.clone()),
            )),
            users: Arc::new(UserServiceImpl::new(store)),
            verifier: Arc::new(TokenVerifier::new(&settings)),
        };

        Self {
            router: auth_router(state),
            issuer,
        }
    }

    /// Chat service backed by a fresh in-memory store
    pub fn chat() -> Self {
        let settings = jwt_settings(TEST_SECRET);
        let store = Arc::new(InMemoryChatStore::default());

        let state = ChatState {
            chats: Arc::new(ChatServiceImpl::new(store.clone())),
            messages: Arc::new(MessageServiceImpl::new(store.clone(), store)),
            verifier: Arc::new(TokenVerifier::new(&settings)),
        };

        Self {
            router: chat_router(state),
            issuer: TokenIssuer::new(&settings),
        }
    }

    /// Mint a valid token for an arbitrary identity
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.issuer
            .issue(user_id, "tester", vec![DEFAULT_GROUP_ID])
            .unwrap()
            .token
    }

    /// Send a request with optional JSON body and optional raw Authorization header
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.send("GET", uri, None, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send("POST", uri, Some(body), None).await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, uri: &str, token: &str) -> Response {
        self.send("GET", uri, None, Some(&format!("Bearer {}", token)))
            .await
    }

    /// Make an authenticated request with a JSON body
    pub async fn json_auth(&self, method: &str, uri: &str, body: Value, token: &str) -> Response {
        self.send(method, uri, Some(body), Some(&format!("Bearer {}", token)))
            .await
    }

    /// Make an authenticated DELETE request without a body
    pub async fn delete_auth(&self, uri: &str, token: &str) -> Response {
        self.send("DELETE", uri, None, Some(&format!("Bearer {}", token)))
            .await
    }
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Random registration payload with a unique login
pub fn fake_registration() -> Value {
    let username: String = Username().fake();
    let password: String = Password(8..16).fake();
    serde_json::json!({
        "username": username,
        "login": format!("{}_{}", username, &Uuid::new_v4().simple().to_string()[..8]),
        "password": password,
    })
}
