use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "1.5";

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("stored options are not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("posts_per_check must be -1 or positive, got {0}")]
    InvalidPostLimit(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub comment_type: String,
    // -1 表示全部文章
    pub posts_per_check: i64,
    pub api_call_counter: u32,
    pub api_call_limit: u32,
    pub exclude_retweets: bool,
    pub manual_cron: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            comment_type: String::new(),
            posts_per_check: -1,
            api_call_counter: 0,
            api_call_limit: 150,
            exclude_retweets: true,
            manual_cron: false,
        }
    }
}

impl Options {
    pub fn from_json(raw: &str) -> Result<Self, OptionsError> {
        // posts_per_check 只在扫描时校验，计数器重置不受其影响
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn post_limit(&self) -> Result<Option<u32>, OptionsError> {
        match self.posts_per_check {
            -1 => Ok(None),
            n if n > 0 => Ok(Some(u32::try_from(n).unwrap_or(u32::MAX))),
            n => Err(OptionsError::InvalidPostLimit(n)),
        }
    }
}

/// Numeric comparison of dotted versions, e.g. `1.10 > 1.5`.
pub fn version_before(stored: Option<&str>, target: &str) -> bool {
    fn parts(v: &str) -> Vec<u64> {
        v.trim()
            .split('.')
            .map(|p| p.parse::<u64>().unwrap_or(0))
            .collect()
    }

    let Some(stored) = stored else {
        return true;
    };
    let (mut a, mut b) = (parts(stored), parts(target));
    let len = a.len().max(b.len());
    a.resize(len, 0);
    b.resize(len, 0);
    a < b
}
