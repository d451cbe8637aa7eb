use anyhow::Result;
use chrono::TimeZone;
use domain::{protocol::USER_AGENT, NewComment};
use tracing::info;

use crate::pipeline::Pipeline;

impl Pipeline {
    pub async fn insert_comment(&self, comment: &mut NewComment) -> Result<Option<i64>> {
        comment.author_ip.clear();
        comment.agent = USER_AGENT.to_string();
        comment.date = self
            .config
            .site_offset
            .from_utc_datetime(&comment.date_gmt)
            .naive_local();

        if let Some(existing) = self.comments.find_duplicate(comment).await? {
            info!(
                post_id = comment.post_id,
                existing,
                author = %comment.author,
                "Duplicate mention skipped"
            );
            return Ok(None);
        }

        let id = self.comments.insert_comment(comment).await?;
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{pipeline_with, FakeSource, MemoryHost};
    use crate::PipelineConfig;
    use chrono::{FixedOffset, NaiveDate};
    use domain::{protocol::USER_AGENT, NewComment};
    use std::sync::Arc;

    fn comment(post_id: i64) -> NewComment {
        let gmt = NaiveDate::from_ymd_opt(2012, 1, 1)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        NewComment {
            post_id,
            author: "@carol".to_string(),
            author_email: "carol@twitter.com".to_string(),
            author_url: "http://twitter.com/carol/status/77/".to_string(),
            author_ip: "10.0.0.1".to_string(),
            content: "Loved it".to_string(),
            date: gmt,
            date_gmt: gmt,
            comment_type: String::new(),
            agent: "something else".to_string(),
        }
    }

    #[tokio::test]
    async fn test_local_time_comes_from_mention_time() {
        let host = Arc::new(MemoryHost::default());
        let source = Arc::new(FakeSource::default());
        let post = host.add_post("a", 1);
        let config = PipelineConfig {
            site_offset: FixedOffset::west_opt(5 * 3600).unwrap(),
            ..PipelineConfig::default()
        };
        let pipeline = pipeline_with(&host, &source, config);

        let mut record = comment(post.id);
        let id = pipeline.insert_comment(&mut record).await.unwrap().unwrap();

        let stored = host.comments_of(post.id).into_iter().find(|c| c.id == id).unwrap();
        assert_eq!(stored.date.to_string(), "2012-01-01 18:30:00");
        assert_eq!(stored.date_gmt.to_string(), "2012-01-01 23:30:00");
        assert_eq!(stored.agent, USER_AGENT);
        assert_eq!(record.author_ip, "");
    }

    #[tokio::test]
    async fn test_duplicates_are_not_inserted_twice() {
        let host = Arc::new(MemoryHost::default());
        let source = Arc::new(FakeSource::default());
        let post = host.add_post("a", 1);
        let pipeline = pipeline_with(&host, &source, PipelineConfig::default());

        assert!(pipeline.insert_comment(&mut comment(post.id)).await.unwrap().is_some());
        assert!(pipeline.insert_comment(&mut comment(post.id)).await.unwrap().is_none());
        assert_eq!(host.comment_count(post.id), 1);
    }
}
