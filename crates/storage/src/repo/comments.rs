use crate::{models::SqlComment, Db};
use domain::{Comment, NewComment};
use sqlx::Row;

impl Db {
    pub async fn insert_comment(&self, c: &NewComment) -> anyhow::Result<i64> {
        let status = if self.hold_for_moderation {
            "pending"
        } else {
            "approved"
        };

        let result = sqlx::query(
            r#"
            INSERT INTO comments (
                post_id, author, author_email, author_url, author_ip,
                content, date, date_gmt, comment_type, agent, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(c.post_id)
        .bind(&c.author)
        .bind(&c.author_email)
        .bind(&c.author_url)
        .bind(&c.author_ip)
        .bind(&c.content)
        .bind(c.date)
        .bind(c.date_gmt)
        .bind(&c.comment_type)
        .bind(&c.agent)
        .bind(status)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(comment_id = id, post_id = c.post_id, status, "Comment stored");
        Ok(id)
    }

    pub async fn get_comment(&self, comment_id: i64) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query_as::<_, SqlComment>(
            r#"
            SELECT
                id, post_id, author, author_email, author_url, content,
                date, date_gmt, comment_type, agent, status
            FROM comments
            WHERE id = ?
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn list_comments(&self, post_id: i64) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(
            r#"
            SELECT
                id, post_id, author, author_email, author_url, content,
                date, date_gmt, comment_type, agent, status
            FROM comments
            WHERE post_id = ?
            ORDER BY date_gmt DESC, id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // 同一文章、未删除、作者名或邮箱相同、内容相同
    pub async fn find_duplicate_comment(&self, c: &NewComment) -> anyhow::Result<Option<i64>> {
        let row = sqlx::query(
            r#"
            SELECT id FROM comments
            WHERE post_id = ?
              AND status != 'trash'
              AND (author = ? OR (? != '' AND author_email = ?))
              AND content = ?
            LIMIT 1
            "#,
        )
        .bind(c.post_id)
        .bind(&c.author)
        .bind(&c.author_email)
        .bind(&c.author_email)
        .bind(&c.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get(0)))
    }

    // 已存在时保留首次写入的值
    pub async fn add_comment_meta(
        &self,
        comment_id: i64,
        key: &str,
        value: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO comment_meta (comment_id, meta_key, meta_value) VALUES (?, ?, ?)",
        )
        .bind(comment_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_comment_meta(
        &self,
        comment_id: i64,
        key: &str,
    ) -> anyhow::Result<Option<String>> {
        let row =
            sqlx::query("SELECT meta_value FROM comment_meta WHERE comment_id = ? AND meta_key = ?")
                .bind(comment_id)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| r.get(0)))
    }

    #[cfg(test)]
    pub(crate) async fn set_comment_status(&self, comment_id: i64, status: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE comments SET status = ? WHERE id = ?")
            .bind(status)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
