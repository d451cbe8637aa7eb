use crate::Db;
use domain::{version_before, Options, SCHEMA_VERSION};
use sqlx::Row;
use tracing::info;

pub const OPTIONS_KEY: &str = "twitter_mentions_as_comments_options";
pub const LEGACY_OPTIONS_KEY: &str = "tmac_options";
pub const VERSION_KEY: &str = "twitter_mentions_as_comments_version";

impl Db {
    pub async fn get_option(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM options WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get(0)))
    }

    pub async fn set_option(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO options (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value"
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_option(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM options WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn load_options(&self) -> anyhow::Result<Options> {
        match self.get_option(OPTIONS_KEY).await? {
            Some(raw) => Ok(Options::from_json(&raw)?),
            None => Ok(Options::default()),
        }
    }

    pub async fn save_options(&self, options: &Options) -> anyhow::Result<()> {
        self.set_option(OPTIONS_KEY, &options.to_json()?).await
    }

    pub async fn activate_options(&self) -> anyhow::Result<Options> {
        let stored_version = self.get_option(VERSION_KEY).await?;

        // 1.5 之前的版本使用旧的存储键
        if version_before(stored_version.as_deref(), "1.5") {
            if let Some(legacy) = self.get_option(LEGACY_OPTIONS_KEY).await? {
                info!(
                    from = stored_version.as_deref().unwrap_or("none"),
                    "Migrating options from legacy key"
                );
                self.set_option(OPTIONS_KEY, &legacy).await?;
                self.delete_option(LEGACY_OPTIONS_KEY).await?;
            }
        }

        let options = self.load_options().await?;
        self.save_options(&options).await?;
        self.set_option(VERSION_KEY, SCHEMA_VERSION).await?;
        Ok(options)
    }
}
