use anyhow::Result;
use domain::protocol::{IMAGE_META_KEY, USER_AGENT};
use domain::Comment;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::pipeline::Pipeline;

static AVATAR_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^'"\s>]*"#).expect("avatar url pattern is valid"));

impl Pipeline {
    pub async fn filter_avatar(&self, avatar: &str, comment: &Comment) -> Result<String> {
        if comment.agent != USER_AGENT {
            return Ok(avatar.to_string());
        }

        let Some(image) = self.comments.comment_meta(comment.id, IMAGE_META_KEY).await? else {
            return Ok(avatar.to_string());
        };

        Ok(AVATAR_URL.replace_all(avatar, NoExpand(&image)).into_owned())
    }
}
