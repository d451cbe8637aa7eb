use chrono::NaiveDateTime;
use domain::{Comment, Post, Profile};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SqlPost {
    pub id: i64,
    pub title: String,
    pub permalink: String,
    pub published_at: NaiveDateTime,
}

impl From<SqlPost> for Post {
    fn from(sql: SqlPost) -> Self {
        Post {
            id: sql.id,
            title: sql.title,
            permalink: sql.permalink,
            published_at: sql.published_at,
        }
    }
}

#[derive(FromRow)]
pub struct SqlComment {
    pub id: i64,
    pub post_id: i64,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub content: String,
    pub date: NaiveDateTime,
    pub date_gmt: NaiveDateTime,
    pub comment_type: String,
    pub agent: String,
    pub status: String,
}

impl From<SqlComment> for Comment {
    fn from(sql: SqlComment) -> Self {
        Comment {
            id: sql.id,
            post_id: sql.post_id,
            author: sql.author,
            author_email: sql.author_email,
            author_url: sql.author_url,
            content: sql.content,
            date: sql.date,
            date_gmt: sql.date_gmt,
            comment_type: sql.comment_type,
            agent: sql.agent,
            status: sql.status,
        }
    }
}

// 作者名缓存
#[derive(FromRow)]
pub struct SqlProfile {
    pub handle: String,
    pub display_name: Option<String>,
}

impl From<SqlProfile> for Profile {
    fn from(sql: SqlProfile) -> Self {
        Profile {
            handle: sql.handle,
            name: sql.display_name,
        }
    }
}
