use crate::{models::SqlPost, Db};
use chrono::NaiveDateTime;
use domain::Post;
use sqlx::Row;

impl Db {
    /// Newest first. `None` returns every post.
    pub async fn recent_posts(&self, limit: Option<u32>) -> anyhow::Result<Vec<Post>> {
        // SQLite 中 LIMIT -1 表示不限制
        let limit = limit.map(i64::from).unwrap_or(-1);
        let rows = sqlx::query_as::<_, SqlPost>(
            r#"
            SELECT id, title, permalink, published_at
            FROM posts
            ORDER BY published_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // 文章由宿主发布，这里只用于初始化数据
    pub async fn insert_post(
        &self,
        title: &str,
        permalink: &str,
        published_at: NaiveDateTime,
    ) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO posts (title, permalink, published_at) VALUES (?, ?, ?)",
        )
        .bind(title)
        .bind(permalink)
        .bind(published_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_post_meta(&self, post_id: i64, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT meta_value FROM post_meta WHERE post_id = ? AND meta_key = ?")
            .bind(post_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get(0)))
    }

    pub async fn set_post_meta(&self, post_id: i64, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO post_meta (post_id, meta_key, meta_value) VALUES (?, ?, ?)
            ON CONFLICT(post_id, meta_key) DO UPDATE SET meta_value = excluded.meta_value
            "#,
        )
        .bind(post_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
