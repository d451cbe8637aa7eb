use adapter::MentionSource;
use chrono::{FixedOffset, Offset, Utc};
use domain::Post;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;
use typed_builder::TypedBuilder;

use crate::hooks::{Hooks, NoHooks};
use crate::host::{AuthorCache, CommentStore, OptionStore, PostStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhrase {
    #[default]
    Permalink,
    Title,
}

impl SearchPhrase {
    pub(crate) fn for_post<'a>(&self, post: &'a Post) -> &'a str {
        match self {
            SearchPhrase::Permalink => &post.permalink,
            SearchPhrase::Title => &post.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub site_offset: FixedOffset,
    pub search_phrase: SearchPhrase,
    pub author_cache_ttl: chrono::Duration,
    pub watermark_write_attempts: u32,
    pub watermark_retry_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            site_offset: Utc.fix(),
            search_phrase: SearchPhrase::Permalink,
            author_cache_ttl: chrono::Duration::hours(24),
            watermark_write_attempts: 3,
            watermark_retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(TypedBuilder)]
pub struct Pipeline {
    pub(crate) posts: Arc<dyn PostStore>,
    pub(crate) comments: Arc<dyn CommentStore>,
    pub(crate) options: Arc<dyn OptionStore>,
    pub(crate) authors: Arc<dyn AuthorCache>,
    pub(crate) source: Arc<dyn MentionSource>,
    #[builder(default = Arc::new(NoHooks) as Arc<dyn Hooks>)]
    pub(crate) hooks: Arc<dyn Hooks>,
    #[builder(default)]
    pub(crate) config: PipelineConfig,
    #[builder(setter(skip), default)]
    pub(crate) run_lock: Mutex<()>,
}

impl Pipeline {
    pub async fn activate(&self) -> anyhow::Result<domain::Options> {
        self.options.activate().await
    }

    pub fn comments(&self) -> &Arc<dyn CommentStore> {
        &self.comments
    }
}

pub(crate) struct ApiCalls {
    count: u32,
    limit: u32,
    warned: bool,
}

impl ApiCalls {
    pub fn new(count: u32, limit: u32) -> Self {
        Self {
            count,
            limit,
            warned: false,
        }
    }

    pub fn record(&mut self) {
        self.count = self.count.saturating_add(1);
        if self.count > self.limit && !self.warned {
            warn!(
                count = self.count,
                limit = self.limit,
                "API call soft limit exceeded this hour"
            );
            self.warned = true;
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
