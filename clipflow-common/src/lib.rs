//! # ClipFlow Common Library
//!
//! Shared code for the ClipFlow production pipeline services including:
//! - Database models, initialization, and settings
//! - Workflow domain types (statuses, roles, transition table)
//! - SLA computation
//! - API envelope types
//! - Notification event types
//! - Configuration loading

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod sla;
pub mod time;
pub mod workflow;

pub use error::{Error, Result};
pub use workflow::{RecordingStatus, Role};
