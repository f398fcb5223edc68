//! Application Layer
//!
//! Business logic services and the request/response DTOs that the
//! presentation layer serializes.

pub mod dto;
pub mod services;
