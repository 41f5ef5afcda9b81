use std::{fs, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use async_trait::async_trait;
use session_core::SessionStore;
use shared::domain::{CurrentUser, Organization};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};

const KEY_SELECTED_ORGANIZATION: &str = "selected_organization";
const KEY_CURRENT_USER: &str = "current_user";

/// Local key-value persistence for session state that must survive a
/// restart. Values are JSON-encoded; one row per well-known key.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_parent_dir(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn save_selected_organization(&self, organization: &Organization) -> Result<()> {
        let value =
            serde_json::to_string(organization).context("failed to encode organization")?;
        self.put_value(KEY_SELECTED_ORGANIZATION, &value).await
    }

    pub async fn load_selected_organization(&self) -> Result<Option<Organization>> {
        let Some(raw) = self.get_value(KEY_SELECTED_ORGANIZATION).await? else {
            return Ok(None);
        };
        let organization =
            serde_json::from_str(&raw).context("failed to decode persisted organization")?;
        Ok(Some(organization))
    }

    pub async fn clear_selected_organization(&self) -> Result<()> {
        self.delete_value(KEY_SELECTED_ORGANIZATION).await
    }

    pub async fn save_current_user(&self, user: &CurrentUser) -> Result<()> {
        let value = serde_json::to_string(user).context("failed to encode user")?;
        self.put_value(KEY_CURRENT_USER, &value).await
    }

    pub async fn load_current_user(&self) -> Result<Option<CurrentUser>> {
        let Some(raw) = self.get_value(KEY_CURRENT_USER).await? else {
            return Ok(None);
        };
        let user = serde_json::from_str(&raw).context("failed to decode persisted user")?;
        Ok(Some(user))
    }

    pub async fn clear_current_user(&self) -> Result<()> {
        self.delete_value(KEY_CURRENT_USER).await
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO session_values (key, value, updated_at)
             VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM session_values WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    async fn delete_value(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM session_values WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for Storage {
    async fn load_selected_organization(&self) -> Result<Option<Organization>> {
        Storage::load_selected_organization(self).await
    }

    async fn load_current_user(&self) -> Result<Option<CurrentUser>> {
        Storage::load_current_user(self).await
    }
}

fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let Some(path) = file_backed_path(database_url) else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create directory '{}' for session db '{database_url}'",
                parent.display()
            )
        })?;
    }

    Ok(())
}

// sqlite::memory: and non-sqlite URLs have no backing file to prepare.
fn file_backed_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;

    if rest.is_empty() || rest.starts_with(":memory:") {
        return None;
    }

    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() {
        return None;
    }

    Some(PathBuf::from(path))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
