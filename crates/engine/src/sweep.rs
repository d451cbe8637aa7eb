use anyhow::Result;
use tracing::{info, warn};

use crate::pipeline::{ApiCalls, Pipeline};

impl Pipeline {
    pub async fn sweep(&self) -> Result<usize> {
        let _guard = self.run_lock.lock().await;
        self.run_sweep().await
    }

    // 调用方需持有 run_lock
    pub(crate) async fn run_sweep(&self) -> Result<usize> {
        let options = self.options.load_options().await?;
        let limit = options.post_limit()?;
        let mut calls = ApiCalls::new(options.api_call_counter, options.api_call_limit);

        let posts = self.posts.recent_posts(limit).await?;
        let posts = self.hooks.filter_sweep_posts(posts);
        info!(posts = posts.len(), "Starting mention sweep");

        let mut total = 0;
        for post in &posts {
            match self.ingest_post(post, &options, &mut calls).await {
                Ok(0) => {}
                Ok(n) => {
                    info!(post_id = post.id, inserted = n, "New mentions added as comments");
                    total += n;
                }
                // 单篇文章失败不影响其它文章，下次轮询重试
                Err(e) => warn!(post_id = post.id, "Mention check failed: {:#}", e),
            }
        }

        self.store_api_counter(calls.count()).await?;
        self.hooks.on_sweep_finished(total);
        info!(inserted = total, api_calls = calls.count(), "Mention sweep finished");
        Ok(total)
    }

    async fn store_api_counter(&self, count: u32) -> Result<()> {
        // 重新读取，保留扫描期间对其它选项的修改
        let mut latest = self.options.load_options().await?;
        latest.api_call_counter = count;
        self.options.save_options(&latest).await
    }
}
