use crate::models::MentionId;
use chrono::{DateTime, NaiveDateTime};

pub const USER_AGENT: &str = "Twitter Mentions as Comments";

pub const LAST_ID_META_KEY: &str = "tmac_last_id";

pub const IMAGE_META_KEY: &str = "tmac_image";

pub fn author_email(handle: &str) -> String {
    format!("{}@twitter.com", handle)
}

pub fn author_url(handle: &str, mention_id: &MentionId) -> String {
    format!("http://twitter.com/{}/status/{}/", handle, mention_id)
}

pub fn mention_id_from_author_url(url: &str) -> Option<MentionId> {
    let segment = url.trim_end_matches('/').rsplit('/').next()?;
    MentionId::new(segment).ok()
}

pub fn format_author_name(handle: &str, real_name: Option<&str>) -> String {
    match real_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{} (@{})", name, handle),
        None => format!("@{}", handle),
    }
}

pub fn is_retweet(text: &str) -> bool {
    text.starts_with("RT")
}

pub fn parse_mention_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y") {
        return Some(dt.naive_utc());
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc())
}
