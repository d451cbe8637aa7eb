use crate::{models::SqlProfile, Db};
use chrono::Utc;
use domain::Profile;

impl Db {
    // 获取本地缓存的作者名，过期视为未命中
    pub async fn get_cached_profile(
        &self,
        handle: &str,
        max_age: chrono::Duration,
    ) -> anyhow::Result<Option<Profile>> {
        let threshold = Utc::now().naive_utc() - max_age;

        let profile = sqlx::query_as::<_, SqlProfile>(
            r#"
            SELECT handle, display_name
            FROM profiles
            WHERE handle = ? AND last_updated_at > ?
            "#,
        )
        .bind(handle.to_lowercase())
        .bind(threshold)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile.map(Into::into))
    }

    // 更新缓存
    pub async fn upsert_profile(
        &self,
        handle: &str,
        display_name: Option<&str>,
    ) -> anyhow::Result<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO profiles (handle, display_name, last_updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(handle) DO UPDATE SET
                display_name = excluded.display_name,
                last_updated_at = excluded.last_updated_at
            "#,
        )
        .bind(handle.to_lowercase())
        .bind(display_name)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
