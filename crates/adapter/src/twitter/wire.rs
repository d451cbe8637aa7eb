use domain::{Mention, MentionId, MentionPage, Profile};
use serde::Deserialize;

use crate::SourceError;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<WireTweet>,
    pub max_id_str: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTweet {
    pub id_str: String,
    pub from_user: String,
    pub from_user_name: Option<String>,
    pub text: String,
    pub created_at: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub screen_name: Option<String>,
    pub name: Option<String>,
}

impl SearchResponse {
    pub fn into_page(self) -> Result<MentionPage, SourceError> {
        let mentions = self
            .results
            .into_iter()
            .map(WireTweet::into_mention)
            .collect::<Result<Vec<_>, _>>()?;

        // 缺少 max_id_str 时退回到结果中的最大 ID
        let max_id = match self.max_id_str.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => MentionId::new(raw)
                .map_err(|e| SourceError::Malformed(format!("max_id_str: {}", e)))?,
            None => mentions
                .iter()
                .map(|m| m.id.clone())
                .max()
                .unwrap_or_default(),
        };

        Ok(MentionPage { mentions, max_id })
    }
}

impl WireTweet {
    fn into_mention(self) -> Result<Mention, SourceError> {
        let id = MentionId::new(&self.id_str)
            .map_err(|e| SourceError::Malformed(format!("id_str: {}", e)))?;
        if self.from_user.trim().is_empty() {
            return Err(SourceError::Malformed(format!(
                "mention {} has no author handle",
                id
            )));
        }

        Ok(Mention {
            id,
            from_user: self.from_user,
            from_user_name: self.from_user_name.filter(|n| !n.trim().is_empty()),
            text: self.text,
            created_at: self.created_at,
            profile_image_url: self.profile_image_url.filter(|u| !u.is_empty()),
        })
    }
}

impl WireUser {
    pub fn into_profile(self, handle: &str) -> Profile {
        Profile {
            handle: self.screen_name.unwrap_or_else(|| handle.to_string()),
            name: self.name.filter(|n| !n.trim().is_empty()),
        }
    }
}
