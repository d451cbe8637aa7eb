use adapter::TwitterConfig;
use anyhow::anyhow;
use chrono::FixedOffset;
use config::ConfigError;
use engine::{PipelineConfig, SearchPhrase};
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub twitter: TwitterSettings,
    pub site: SiteSettings,
    pub scheduler: SchedulerSettings,
    pub pipeline: PipelineSettings,
    pub security: SecuritySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    // 新评论是否进入待审核状态
    pub hold_for_moderation: bool,
}

#[derive(Deserialize, Clone)]
pub struct TwitterSettings {
    pub search_url: String,
    pub profile_url: String,
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
    pub results_per_page: u32,
}

#[derive(Deserialize, Clone)]
pub struct SiteSettings {
    pub utc_offset_minutes: i32,
    pub search_phrase: SearchPhrase,
}

#[derive(Deserialize, Clone)]
pub struct SchedulerSettings {
    pub interval_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct PipelineSettings {
    pub author_cache_hours: i64,
    pub watermark_write_attempts: u32,
    pub watermark_retry_ms: u64,
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    pub admin_token: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let s = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://data/mentions.db")?
            .set_default("database.hold_for_moderation", false)?
            .set_default("twitter.search_url", "http://search.twitter.com/search.json")?
            .set_default("twitter.profile_url", "http://api.twitter.com/1/users/show.json")?
            .set_default("twitter.timeout_secs", 30)?
            .set_default("twitter.results_per_page", 100)?
            .set_default("site.utc_offset_minutes", 0)?
            .set_default("site.search_phrase", "permalink")?
            .set_default("scheduler.interval_secs", 3600)?
            .set_default("pipeline.author_cache_hours", 24)?
            .set_default("pipeline.watermark_write_attempts", 3)?
            .set_default("pipeline.watermark_retry_ms", 500)?
            .set_default("security.admin_token", "admin_secret_123")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(
                config::Environment::with_prefix("MENTIONS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn twitter_config(&self) -> TwitterConfig {
        TwitterConfig {
            search_url: self.twitter.search_url.clone(),
            profile_url: self.twitter.profile_url.clone(),
            bearer_token: self.twitter.bearer_token.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(self.twitter.timeout_secs),
            results_per_page: self.twitter.results_per_page,
        }
    }

    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let site_offset = self
            .site
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow!(
                    "site.utc_offset_minutes out of range: {}",
                    self.site.utc_offset_minutes
                )
            })?;
        let author_cache_ttl = chrono::Duration::try_hours(self.pipeline.author_cache_hours)
            .filter(|ttl| *ttl >= chrono::Duration::zero())
            .ok_or_else(|| {
                anyhow!(
                    "pipeline.author_cache_hours out of range: {}",
                    self.pipeline.author_cache_hours
                )
            })?;

        Ok(PipelineConfig {
            site_offset,
            search_phrase: self.site.search_phrase,
            author_cache_ttl,
            watermark_write_attempts: self.pipeline.watermark_write_attempts,
            watermark_retry_delay: Duration::from_millis(self.pipeline.watermark_retry_ms),
        })
    }
}
