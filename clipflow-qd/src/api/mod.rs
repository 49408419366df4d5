//! HTTP API handlers for clipflow-qd

pub mod auth;
pub mod claim;
pub mod dispatch;
pub mod execution;
pub mod health;
pub mod notifications;
pub mod queue;
pub mod runtime_config;

pub use auth::auth_middleware;
