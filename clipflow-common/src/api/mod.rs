//! Shared API types for ClipFlow services

pub mod types;

pub use types::ApiResponse;
