//! Database initialization
//!
//! Creates the SQLite database on first run with the full schema, and seeds
//! default settings. Safe to call repeatedly; every step is idempotent.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer; claim and dispatch
    // writes contend on the single writer, which is what makes their
    // conditional UPDATEs atomic with respect to each other.
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Wait for the writer instead of failing fast on SQLITE_BUSY
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_videos_table(&pool).await?;
    create_actors_table(&pool).await?;
    create_notifications_table(&pool).await?;
    create_settings_table(&pool).await?;

    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create the videos table
///
/// One row per work item. Claim fields are cleared together on release and
/// on successful status transition.
pub async fn create_videos_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS videos (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            recording_status TEXT NOT NULL DEFAULT 'NOT_RECORDED'
                CHECK (recording_status IN (
                    'NEEDS_SCRIPT', 'GENERATING_SCRIPT', 'AI_RENDERING', 'READY_FOR_REVIEW',
                    'NOT_RECORDED', 'RECORDED', 'EDITED', 'READY_TO_POST', 'POSTED')),
            priority TEXT NOT NULL DEFAULT 'normal' CHECK (priority IN ('normal', 'rush')),
            claimed_by TEXT,
            claim_role TEXT CHECK (claim_role IS NULL OR claim_role IN ('recorder', 'editor', 'uploader')),
            claim_expires_at INTEGER,
            last_status_changed_at INTEGER NOT NULL,
            script_locked_text TEXT,
            recording_notes TEXT,
            editor_notes TEXT,
            uploader_notes TEXT,
            final_video_url TEXT,
            posted_url TEXT,
            posted_platform TEXT,
            posted_account TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            CHECK ((claimed_by IS NULL) = (claim_role IS NULL)),
            CHECK ((claimed_by IS NULL) = (claim_expires_at IS NULL))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_videos_status ON videos(recording_status)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_videos_claimed_by ON videos(claimed_by)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_videos_stage_age ON videos(recording_status, last_status_changed_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the actors table
pub async fn create_actors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS actors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            api_key TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL CHECK (role IN ('recorder', 'editor', 'uploader', 'admin')),
            plan TEXT NOT NULL DEFAULT 'free' CHECK (plan IN ('free', 'pro')),
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_actors_api_key ON actors(api_key)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the notifications table
pub async fn create_notifications_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            actor_id TEXT,
            role TEXT NOT NULL CHECK (role IN ('recorder', 'editor', 'uploader')),
            kind TEXT NOT NULL CHECK (kind IN ('assigned', 'handoff')),
            video_id TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
            message TEXT NOT NULL,
            read INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_notifications_recipient ON notifications(actor_id, read)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notifications_role ON notifications(role, read)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores runtime-tunable configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// Ensures all required settings exist with default values, and resets NULL
/// values back to defaults.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // Claim lifecycle
    ensure_setting(pool, "claim_ttl_minutes", "240").await?;

    // Queue listing
    ensure_setting(pool, "queue_default_limit", "50").await?;

    // Plan gating for auto-dispatch
    ensure_setting(pool, "dispatch_requires_subscription", "false").await?;

    // Incident banner served via runtime-config
    ensure_setting(pool, "incident_mode", "false").await?;
    ensure_setting(pool, "incident_message", "").await?;

    info!("Default settings initialized");
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if !exists {
        // INSERT OR IGNORE handles concurrent initialization: multiple
        // services may pass the exists check simultaneously
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(default_value)
            .execute(pool)
            .await?;
        return Ok(());
    }

    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if value.is_none() {
        sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
            .bind(default_value)
            .bind(key)
            .execute(pool)
            .await?;
        warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
    }

    Ok(())
}
