use async_trait::async_trait;
use domain::{MentionId, MentionPage, Profile};

use crate::SourceError;

#[async_trait]
pub trait MentionSource: Send + Sync {
    async fn search(&self, phrase: &str, since_id: &MentionId) -> Result<MentionPage, SourceError>;

    async fn profile(&self, handle: &str) -> Result<Option<Profile>, SourceError>;
}
