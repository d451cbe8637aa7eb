use domain::{protocol, Mention};
use tracing::warn;

use crate::pipeline::{ApiCalls, Pipeline};

impl Pipeline {
    pub(crate) async fn author_name(&self, mention: &Mention, calls: &mut ApiCalls) -> String {
        let real_name = self
            .real_name(&mention.from_user, mention.from_user_name.as_deref(), calls)
            .await;
        protocol::format_author_name(&mention.from_user, real_name.as_deref())
    }

    async fn real_name(
        &self,
        handle: &str,
        hint: Option<&str>,
        calls: &mut ApiCalls,
    ) -> Option<String> {
        match self
            .authors
            .cached_author(handle, self.config.author_cache_ttl)
            .await
        {
            // 缓存的“无名”不覆盖搜索结果里的显示名
            Ok(Some(profile)) if profile.name.is_some() || hint.is_none() => return profile.name,
            Ok(_) => {}
            Err(e) => warn!(handle, "Author cache lookup failed: {:#}", e),
        }

        // 搜索结果自带显示名时无需额外请求
        let name = match hint {
            Some(name) => Some(name.to_string()),
            None => {
                calls.record();
                match self.source.profile(handle).await {
                    Ok(profile) => profile.and_then(|p| p.name),
                    Err(e) => {
                        warn!(handle, "Profile lookup failed: {}", e);
                        return None;
                    }
                }
            }
        };

        if let Err(e) = self.authors.remember_author(handle, name.as_deref()).await {
            warn!(handle, "Failed to cache author name: {:#}", e);
        }
        name
    }
}
