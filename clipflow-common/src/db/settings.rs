//! Typed accessors for the settings table

use crate::Result;
use sqlx::SqlitePool;

/// Read a setting as a string, falling back to `default` when absent or NULL
pub async fn get_string(pool: &SqlitePool, key: &str, default: &str) -> Result<String> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(value.flatten().unwrap_or_else(|| default.to_string()))
}

/// Read a setting as i64, falling back to `default` on absence or parse failure
pub async fn get_i64(pool: &SqlitePool, key: &str, default: i64) -> Result<i64> {
    let raw = get_string(pool, key, &default.to_string()).await?;
    Ok(raw.parse().unwrap_or(default))
}

/// Read a setting as bool ("true"/"false"), falling back to `default`
pub async fn get_bool(pool: &SqlitePool, key: &str, default: bool) -> Result<bool> {
    let raw = get_string(pool, key, if default { "true" } else { "false" }).await?;
    Ok(match raw.as_str() {
        "true" | "1" => true,
        "false" | "0" => false,
        _ => default,
    })
}

/// Write a setting value
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;

    #[tokio::test]
    async fn test_settings_roundtrip_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("clipflow.db")).await.unwrap();

        assert_eq!(get_i64(&pool, "claim_ttl_minutes", 0).await.unwrap(), 240);
        assert!(!get_bool(&pool, "incident_mode", false).await.unwrap());
        assert_eq!(get_i64(&pool, "missing_key", 7).await.unwrap(), 7);

        set(&pool, "incident_mode", "true").await.unwrap();
        assert!(get_bool(&pool, "incident_mode", false).await.unwrap());
    }
}
