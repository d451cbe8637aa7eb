use anyhow::Result;
use async_trait::async_trait;
use domain::{Comment, NewComment, Options, Post, Profile};

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn recent_posts(&self, limit: Option<u32>) -> Result<Vec<Post>>;
    async fn post_meta(&self, post_id: i64, key: &str) -> Result<Option<String>>;
    async fn set_post_meta(&self, post_id: i64, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    // 审核状态由宿主决定
    async fn insert_comment(&self, comment: &NewComment) -> Result<i64>;
    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>>;
    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>>;
    async fn find_duplicate(&self, comment: &NewComment) -> Result<Option<i64>>;
    async fn add_comment_meta(&self, comment_id: i64, key: &str, value: &str) -> Result<()>;
    async fn comment_meta(&self, comment_id: i64, key: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn load_options(&self) -> Result<Options>;
    async fn save_options(&self, options: &Options) -> Result<()>;
    async fn activate(&self) -> Result<Options>;
}

#[async_trait]
pub trait AuthorCache: Send + Sync {
    async fn cached_author(&self, handle: &str, max_age: chrono::Duration) -> Result<Option<Profile>>;
    async fn remember_author(&self, handle: &str, name: Option<&str>) -> Result<()>;
}
