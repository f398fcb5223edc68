//! # Domain Layer
//!
//! Entities and repository traits for both services. No dependencies on
//! infrastructure or presentation layers.

pub mod entities;

pub use entities::*;
