use anyhow::Result;
use async_trait::async_trait;
use domain::{Comment, NewComment, Options, Post, Profile};
use storage::Db;

use crate::host::{AuthorCache, CommentStore, OptionStore, PostStore};

#[async_trait]
impl PostStore for Db {
    async fn recent_posts(&self, limit: Option<u32>) -> Result<Vec<Post>> {
        Db::recent_posts(self, limit).await
    }

    async fn post_meta(&self, post_id: i64, key: &str) -> Result<Option<String>> {
        self.get_post_meta(post_id, key).await
    }

    async fn set_post_meta(&self, post_id: i64, key: &str, value: &str) -> Result<()> {
        Db::set_post_meta(self, post_id, key, value).await
    }
}

#[async_trait]
impl CommentStore for Db {
    async fn insert_comment(&self, comment: &NewComment) -> Result<i64> {
        Db::insert_comment(self, comment).await
    }

    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        Db::get_comment(self, comment_id).await
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.list_comments(post_id).await
    }

    async fn find_duplicate(&self, comment: &NewComment) -> Result<Option<i64>> {
        self.find_duplicate_comment(comment).await
    }

    async fn add_comment_meta(&self, comment_id: i64, key: &str, value: &str) -> Result<()> {
        Db::add_comment_meta(self, comment_id, key, value).await
    }

    async fn comment_meta(&self, comment_id: i64, key: &str) -> Result<Option<String>> {
        self.get_comment_meta(comment_id, key).await
    }
}

#[async_trait]
impl OptionStore for Db {
    async fn load_options(&self) -> Result<Options> {
        Db::load_options(self).await
    }

    async fn save_options(&self, options: &Options) -> Result<()> {
        Db::save_options(self, options).await
    }

    async fn activate(&self) -> Result<Options> {
        self.activate_options().await
    }
}

#[async_trait]
impl AuthorCache for Db {
    async fn cached_author(&self, handle: &str, max_age: chrono::Duration) -> Result<Option<Profile>> {
        self.get_cached_profile(handle, max_age).await
    }

    async fn remember_author(&self, handle: &str, name: Option<&str>) -> Result<()> {
        self.upsert_profile(handle, name).await
    }
}
