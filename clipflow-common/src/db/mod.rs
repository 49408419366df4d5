//! Database access layer shared across ClipFlow services

pub mod init;
pub mod models;
pub mod settings;

pub use init::init_database;
