use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MentionIdError {
    #[error("mention id is empty")]
    Empty,
    #[error("mention id '{0}' is not a plain decimal integer")]
    NotDecimal(String),
}

/// Remote mention identifier, kept as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MentionId(String);

impl MentionId {
    pub fn new(s: impl AsRef<str>) -> Result<Self, MentionIdError> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(MentionIdError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MentionIdError::NotDecimal(s.to_string()));
        }
        let trimmed = s.trim_start_matches('0');
        if trimmed.is_empty() {
            return Ok(Self::zero());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MentionId {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for MentionId {
    fn cmp(&self, other: &Self) -> Ordering {
        // 已去掉前导零：位数多者更大，位数相同按字典序
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for MentionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MentionId {
    type Error = MentionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MentionId> for String {
    fn from(id: MentionId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub permalink: String,
    pub published_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: MentionId,
    pub from_user: String,
    pub from_user_name: Option<String>,
    pub text: String,
    pub created_at: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionPage {
    pub mentions: Vec<Mention>,
    // API 报告的最大 ID，与过滤无关
    pub max_id: MentionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub handle: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: i64,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub author_ip: String,
    pub content: String,
    pub date: NaiveDateTime,
    pub date_gmt: NaiveDateTime,
    pub comment_type: String,
    pub agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub content: String,
    pub date: NaiveDateTime,
    pub date_gmt: NaiveDateTime,
    pub comment_type: String,
    pub agent: String,
    pub status: String,
}
