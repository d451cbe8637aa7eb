use anyhow::{anyhow, Context, Result};
use domain::protocol::{self, IMAGE_META_KEY, LAST_ID_META_KEY, USER_AGENT};
use domain::{Mention, MentionId, NewComment, Options, Post};
use tracing::{debug, warn};

use crate::pipeline::{ApiCalls, Pipeline};

impl Pipeline {
    pub(crate) async fn ingest_post(
        &self,
        post: &Post,
        options: &Options,
        calls: &mut ApiCalls,
    ) -> Result<usize> {
        let since = self.resolve_watermark(post.id).await?;
        let phrase = self.config.search_phrase.for_post(post);

        calls.record();
        let page = self
            .source
            .search(phrase, &since)
            .await
            .with_context(|| format!("searching mentions of post {}", post.id))?;
        let next = since.clone().max(page.max_id.clone());

        if page.mentions.is_empty() {
            self.store_watermark(post.id, &next).await?;
            return Ok(0);
        }

        let mut inserted = 0;
        for mention in &page.mentions {
            if options.exclude_retweets && protocol::is_retweet(&mention.text) {
                debug!(post_id = post.id, mention_id = %mention.id, "Skipping retweet");
                continue;
            }

            match self.ingest_mention(post.id, mention, options, calls).await {
                Ok(Some(_)) => inserted += 1,
                Ok(None) => {}
                Err(e) => warn!(
                    post_id = post.id,
                    mention_id = %mention.id,
                    "Mention skipped: {:#}",
                    e
                ),
            }
        }

        // 跳过的转推也计入水位线：max_id 覆盖整页结果
        self.store_watermark(post.id, &next).await?;
        Ok(inserted)
    }

    async fn ingest_mention(
        &self,
        post_id: i64,
        mention: &Mention,
        options: &Options,
        calls: &mut ApiCalls,
    ) -> Result<Option<i64>> {
        let raw_time = mention
            .created_at
            .as_deref()
            .ok_or_else(|| anyhow!("mention has no creation time"))?;
        let date_gmt = protocol::parse_mention_time(raw_time)
            .ok_or_else(|| anyhow!("unparseable creation time '{}'", raw_time))?;

        let author = self.author_name(mention, calls).await;

        let comment = NewComment {
            post_id,
            author,
            author_email: protocol::author_email(&mention.from_user),
            author_url: protocol::author_url(&mention.from_user, &mention.id),
            author_ip: String::new(),
            content: mention.text.clone(),
            date: date_gmt,
            date_gmt,
            comment_type: options.comment_type.clone(),
            agent: USER_AGENT.to_string(),
        };
        let mut comment = self.hooks.filter_comment(comment);

        let Some(comment_id) = self.insert_comment(&mut comment).await? else {
            return Ok(None);
        };

        if let Some(url) = &mention.profile_image_url {
            if let Err(e) = self
                .comments
                .add_comment_meta(comment_id, IMAGE_META_KEY, url)
                .await
            {
                warn!(comment_id, "Failed to cache profile image: {:#}", e);
            }
        }

        self.hooks.on_comment_inserted(comment_id, &comment);
        Ok(Some(comment_id))
    }

    /// Last mention id already ingested for a post.
    pub async fn resolve_watermark(&self, post_id: i64) -> Result<MentionId> {
        let stored = self.posts.post_meta(post_id, LAST_ID_META_KEY).await?;
        let stored = self.hooks.filter_watermark(post_id, stored);

        match stored.as_deref().map(MentionId::new) {
            Some(Ok(id)) => return Ok(id),
            Some(Err(e)) => warn!(post_id, "Stored watermark unusable ({}), recovering", e),
            None => debug!(post_id, "No stored watermark, recovering from comments"),
        }

        let comments = self.comments.comments_for_post(post_id).await?;
        let recovered = comments
            .iter()
            .filter(|c| c.agent == USER_AGENT)
            .find_map(|c| protocol::mention_id_from_author_url(&c.author_url))
            .unwrap_or_default();
        Ok(recovered)
    }

    async fn store_watermark(&self, post_id: i64, id: &MentionId) -> Result<()> {
        let attempts = self.config.watermark_write_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self
                .posts
                .set_post_meta(post_id, LAST_ID_META_KEY, id.as_str())
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts => {
                    warn!(post_id, attempt, "Failed to store watermark, retrying: {:#}", e);
                    tokio::time::sleep(self.config.watermark_retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e.context(format!("storing watermark {} for post {}", id, post_id)))
                }
            }
        }
    }
}
