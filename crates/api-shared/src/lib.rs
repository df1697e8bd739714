//! # API Shared
//!
//! Shared wire types and services for the Med-AI HTTP surface.
//!
//! Contains:
//! - Chat request/response bodies (`chat` module)
//! - `HealthService`
//!
//! Used by `api-rest` for its request, response and OpenAPI schema types.

pub mod chat;
pub mod health;

pub use chat::{ChatReq, ChatRes};
pub use health::{HealthRes, HealthService};
