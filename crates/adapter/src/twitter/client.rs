use async_trait::async_trait;
use domain::{MentionId, MentionPage, Profile};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::wire::{SearchResponse, WireUser};
use crate::{MentionSource, SourceError};

#[derive(Clone, Debug)]
pub struct TwitterConfig {
    pub search_url: String,
    pub profile_url: String,
    pub bearer_token: Option<String>,
    pub timeout: Duration,
    pub results_per_page: u32,
}

pub struct TwitterClient {
    http: Client,
    config: TwitterConfig,
}

impl TwitterClient {
    pub fn new(config: TwitterConfig) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mentions-as-comments/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, SourceError> {
        let mut request = self.http.get(url).query(query);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| SourceError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| SourceError::Network {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| SourceError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl MentionSource for TwitterClient {
    async fn search(&self, phrase: &str, since_id: &MentionId) -> Result<MentionPage, SourceError> {
        debug!(phrase, since_id = %since_id, "Searching mentions");
        let query = [
            ("q", phrase.to_string()),
            ("since_id", since_id.to_string()),
            ("rpp", self.config.results_per_page.to_string()),
            ("result_type", "recent".to_string()),
        ];

        let response: SearchResponse = self
            .get_json(&self.config.search_url, &query)
            .await?
            .ok_or_else(|| SourceError::Status {
                url: self.config.search_url.clone(),
                status: StatusCode::NOT_FOUND.as_u16(),
            })?;

        response.into_page()
    }

    async fn profile(&self, handle: &str) -> Result<Option<Profile>, SourceError> {
        debug!(handle, "Looking up profile");
        let query = [("screen_name", handle.to_string())];
        let user: Option<WireUser> = self.get_json(&self.config.profile_url, &query).await?;
        Ok(user.map(|u| u.into_profile(handle)))
    }
}
