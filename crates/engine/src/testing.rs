use adapter::{MentionSource, SourceError};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{Comment, Mention, MentionId, MentionPage, NewComment, Options, Post, Profile};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::host::{AuthorCache, CommentStore, OptionStore, PostStore};
use crate::pipeline::{Pipeline, PipelineConfig};

pub fn mention(id: &str, handle: &str, text: &str, named: bool) -> Mention {
    Mention {
        id: MentionId::new(id).unwrap(),
        from_user: handle.to_string(),
        from_user_name: named.then(|| format!("Display {}", handle)),
        text: text.to_string(),
        created_at: Some("Thu, 06 Oct 2011 19:36:17 +0000".to_string()),
        profile_image_url: None,
    }
}

pub fn pipeline(host: &Arc<MemoryHost>, source: &Arc<FakeSource>) -> Pipeline {
    pipeline_with(host, source, PipelineConfig::default())
}

pub fn pipeline_with(
    host: &Arc<MemoryHost>,
    source: &Arc<FakeSource>,
    config: PipelineConfig,
) -> Pipeline {
    Pipeline::builder()
        .posts(host.clone())
        .comments(host.clone())
        .options(host.clone())
        .authors(host.clone())
        .source(source.clone())
        .config(PipelineConfig {
            watermark_retry_delay: Duration::from_millis(1),
            ..config
        })
        .build()
}

#[derive(Default)]
pub struct MemoryHost {
    posts: Mutex<Vec<Post>>,
    post_meta: Mutex<HashMap<(i64, String), String>>,
    comments: Mutex<Vec<Comment>>,
    comment_meta: Mutex<HashMap<(i64, String), String>>,
    options: Mutex<Options>,
    authors: Mutex<HashMap<String, Option<String>>>,
    failing_meta_writes: AtomicU32,
}

impl MemoryHost {
    pub fn add_post(&self, slug: &str, day: u32) -> Post {
        let mut posts = self.posts.lock().unwrap();
        let post = Post {
            id: posts.len() as i64 + 1,
            title: slug.to_string(),
            permalink: format!("http://blog.example/{}", slug),
            published_at: NaiveDate::from_ymd_opt(2012, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };
        posts.push(post.clone());
        post
    }

    pub fn options(&self) -> Options {
        self.options.lock().unwrap().clone()
    }

    pub fn update_options(&self, f: impl FnOnce(&mut Options)) {
        let mut options = self.options.lock().unwrap();
        f(&mut *options);
    }

    pub fn watermark(&self, post_id: i64) -> Option<String> {
        self.post_meta
            .lock()
            .unwrap()
            .get(&(post_id, domain::protocol::LAST_ID_META_KEY.to_string()))
            .cloned()
    }

    pub fn set_watermark(&self, post_id: i64, raw: &str) {
        self.post_meta.lock().unwrap().insert(
            (post_id, domain::protocol::LAST_ID_META_KEY.to_string()),
            raw.to_string(),
        );
    }

    pub fn fail_next_meta_writes(&self, n: u32) {
        self.failing_meta_writes.store(n, Ordering::SeqCst);
    }

    pub fn comments_of(&self, post_id: i64) -> Vec<Comment> {
        self.comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }

    pub fn comment_count(&self, post_id: i64) -> usize {
        self.comments_of(post_id).len()
    }

    pub fn add_raw_comment(&self, post_id: i64, author_url: &str, agent: &str) -> i64 {
        let when = NaiveDate::from_ymd_opt(2012, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        self.store(NewComment {
            post_id,
            author: "someone".to_string(),
            author_email: String::new(),
            author_url: author_url.to_string(),
            author_ip: String::new(),
            content: format!("comment via {}", agent),
            date: when,
            date_gmt: when,
            comment_type: String::new(),
            agent: agent.to_string(),
        })
    }

    pub fn meta_of(&self, comment_id: i64, key: &str) -> Option<String> {
        self.comment_meta
            .lock()
            .unwrap()
            .get(&(comment_id, key.to_string()))
            .cloned()
    }

    pub fn cache_author(&self, handle: &str, name: Option<&str>) {
        self.authors
            .lock()
            .unwrap()
            .insert(handle.to_string(), name.map(str::to_string));
    }

    pub fn cached_name(&self, handle: &str) -> Option<Option<String>> {
        self.authors.lock().unwrap().get(handle).cloned()
    }

    fn store(&self, c: NewComment) -> i64 {
        let mut comments = self.comments.lock().unwrap();
        let id = comments.len() as i64 + 1;
        comments.push(Comment {
            id,
            post_id: c.post_id,
            author: c.author,
            author_email: c.author_email,
            author_url: c.author_url,
            content: c.content,
            date: c.date,
            date_gmt: c.date_gmt,
            comment_type: c.comment_type,
            agent: c.agent,
            status: "approved".to_string(),
        });
        id
    }
}

#[async_trait]
impl PostStore for MemoryHost {
    async fn recent_posts(&self, limit: Option<u32>) -> Result<Vec<Post>> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        if let Some(limit) = limit {
            posts.truncate(limit as usize);
        }
        Ok(posts)
    }

    async fn post_meta(&self, post_id: i64, key: &str) -> Result<Option<String>> {
        Ok(self
            .post_meta
            .lock()
            .unwrap()
            .get(&(post_id, key.to_string()))
            .cloned())
    }

    async fn set_post_meta(&self, post_id: i64, key: &str, value: &str) -> Result<()> {
        let pending = self.failing_meta_writes.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_meta_writes.store(pending - 1, Ordering::SeqCst);
            bail!("database is locked");
        }
        self.post_meta
            .lock()
            .unwrap()
            .insert((post_id, key.to_string()), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryHost {
    async fn insert_comment(&self, comment: &NewComment) -> Result<i64> {
        Ok(self.store(comment.clone()))
    }

    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == comment_id)
            .cloned())
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let mut comments = self.comments_of(post_id);
        comments.reverse();
        Ok(comments)
    }

    async fn find_duplicate(&self, comment: &NewComment) -> Result<Option<i64>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| {
                c.post_id == comment.post_id
                    && c.status != "trash"
                    && (c.author == comment.author
                        || (!comment.author_email.is_empty()
                            && c.author_email == comment.author_email))
                    && c.content == comment.content
            })
            .map(|c| c.id))
    }

    async fn add_comment_meta(&self, comment_id: i64, key: &str, value: &str) -> Result<()> {
        self.comment_meta
            .lock()
            .unwrap()
            .entry((comment_id, key.to_string()))
            .or_insert_with(|| value.to_string());
        Ok(())
    }

    async fn comment_meta(&self, comment_id: i64, key: &str) -> Result<Option<String>> {
        Ok(self.meta_of(comment_id, key))
    }
}

#[async_trait]
impl OptionStore for MemoryHost {
    async fn load_options(&self) -> Result<Options> {
        Ok(self.options())
    }

    async fn save_options(&self, options: &Options) -> Result<()> {
        *self.options.lock().unwrap() = options.clone();
        Ok(())
    }

    async fn activate(&self) -> Result<Options> {
        Ok(self.options())
    }
}

#[async_trait]
impl AuthorCache for MemoryHost {
    async fn cached_author(&self, handle: &str, _max_age: chrono::Duration) -> Result<Option<Profile>> {
        Ok(self.cached_name(handle).map(|name| Profile {
            handle: handle.to_string(),
            name,
        }))
    }

    async fn remember_author(&self, handle: &str, name: Option<&str>) -> Result<()> {
        self.cache_author(handle, name);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSource {
    mentions: Mutex<HashMap<String, Vec<Mention>>>,
    max_ids: Mutex<HashMap<String, MentionId>>,
    failing: Mutex<HashSet<String>>,
    profiles: Mutex<HashMap<String, Option<String>>>,
    profiles_down: AtomicBool,
    searched: Mutex<Vec<String>>,
    profile_calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn push(&self, phrase: &str, mention: Mention) {
        self.mentions
            .lock()
            .unwrap()
            .entry(phrase.to_string())
            .or_default()
            .push(mention);
    }

    pub fn set_max_id(&self, phrase: &str, id: &str) {
        self.max_ids
            .lock()
            .unwrap()
            .insert(phrase.to_string(), MentionId::new(id).unwrap());
    }

    pub fn fail(&self, phrase: &str) {
        self.failing.lock().unwrap().insert(phrase.to_string());
    }

    pub fn set_profile(&self, handle: &str, name: Option<&str>) {
        self.profiles
            .lock()
            .unwrap()
            .insert(handle.to_string(), name.map(str::to_string));
    }

    pub fn fail_profiles(&self) {
        self.profiles_down.store(true, Ordering::SeqCst);
    }

    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().unwrap().clone()
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    // 每次搜索先等待这么久
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MentionSource for FakeSource {
    async fn search(&self, phrase: &str, since_id: &MentionId) -> Result<MentionPage, SourceError> {
        self.searched.lock().unwrap().push(phrase.to_string());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        if self.failing.lock().unwrap().contains(phrase) {
            return Err(SourceError::Status {
                url: "http://search.example/search.json".to_string(),
                status: 503,
            });
        }

        let known = self
            .mentions
            .lock()
            .unwrap()
            .get(phrase)
            .cloned()
            .unwrap_or_default();
        let max_id = known
            .iter()
            .map(|m| m.id.clone())
            .chain(self.max_ids.lock().unwrap().get(phrase).cloned())
            .max()
            .unwrap_or_default();
        let mentions = known.into_iter().filter(|m| &m.id > since_id).collect();

        Ok(MentionPage { mentions, max_id })
    }

    async fn profile(&self, handle: &str) -> Result<Option<Profile>, SourceError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.profiles_down.load(Ordering::SeqCst) {
            return Err(SourceError::Malformed("profile service unavailable".to_string()));
        }
        Ok(self.profiles.lock().unwrap().get(handle).map(|name| Profile {
            handle: handle.to_string(),
            name: name.clone(),
        }))
    }
}
