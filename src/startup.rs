//! Application Startup
//!
//! Builds either service from settings and serves it until a shutdown
//! signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthService, AuthServiceImpl, ChatService, ChatServiceImpl, MessageService,
    MessageServiceImpl, TokenIssuer, TokenVerifier, UserService, UserServiceImpl,
};
use crate::config::Settings;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgChatRepository, PgGroupRepository, PgMessageRepository, PgUserRepository,
};
use crate::presentation::http::routes;
use crate::presentation::middleware::create_cors_layer;

/// Auth service state shared across handlers
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub verifier: Arc<TokenVerifier>,
}

/// Chat service state shared across handlers
#[derive(Clone)]
pub struct ChatState {
    pub chats: Arc<dyn ChatService>,
    pub messages: Arc<dyn MessageService>,
    pub verifier: Arc<TokenVerifier>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the auth service: registration, login and user lookup
    pub async fn build_auth(settings: Settings) -> Result<Self> {
        let db = connect(&settings).await?;
        if settings.database.run_migrations {
            database::run_auth_migrations(&db).await?;
            tracing::info!("Auth migrations applied");
        }

        let users = Arc::new(PgUserRepository::new(db.clone()));
        let groups = Arc::new(PgGroupRepository::new(db));
        let issuer = Arc::new(TokenIssuer::new(&settings.jwt));

        let state = AuthState {
            auth: Arc::new(AuthServiceImpl::new(
                users.clone(),
                users.clone(),
                groups,
                issuer,
            )),
            users: Arc::new(UserServiceImpl::new(users)),
            verifier: Arc::new(TokenVerifier::new(&settings.jwt)),
        };

        let router = routes::auth_router(state).layer(create_cors_layer(&settings.cors));
        Self::bind(&settings, router).await
    }

    /// Build the chat service: chats, members and messages
    pub async fn build_chat(settings: Settings) -> Result<Self> {
        let db = connect(&settings).await?;
        if settings.database.run_migrations {
            database::run_chat_migrations(&db).await?;
            tracing::info!("Chat migrations applied");
        }

        let chats = Arc::new(PgChatRepository::new(db.clone()));
        let messages = Arc::new(PgMessageRepository::new(db));

        let state = ChatState {
            chats: Arc::new(ChatServiceImpl::new(chats.clone())),
            messages: Arc::new(MessageServiceImpl::new(messages, chats)),
            verifier: Arc::new(TokenVerifier::new(&settings.jwt)),
        };

        let router = routes::chat_router(state).layer(create_cors_layer(&settings.cors));
        Self::bind(&settings, router).await
    }

    async fn bind(settings: &Settings, router: Router) -> Result<Self> {
        let addr = settings.server.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", settings.server_addr());

        Ok(Self { listener, router })
    }

    /// Run the server until Ctrl-C or SIGTERM
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn connect(settings: &Settings) -> Result<PgPool> {
    let db = database::create_pool(&settings.database).await?;
    tracing::info!("Database connection pool created");
    Ok(db)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
