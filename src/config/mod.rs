//! # Configuration Module
//!
//! Both services load the same `Settings` shape. Configuration can come from:
//! - Environment variables (prefixed with APP__, plus a few plain aliases)
//! - Configuration files (config/default.toml, config/{service}.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_auth::config::Settings;
//!
//! let settings = Settings::load("auth")?;
//! println!("Server will listen on {}", settings.server_addr());
//! ```

mod settings;

pub use settings::*;
