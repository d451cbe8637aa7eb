use domain::{NewComment, PipelineEvent, Post};
use tokio::sync::broadcast;

/// Extension points around the pipeline. Every method defaults to a no-op.
pub trait Hooks: Send + Sync {
    fn filter_sweep_posts(&self, posts: Vec<Post>) -> Vec<Post> {
        posts
    }

    fn filter_watermark(&self, _post_id: i64, raw: Option<String>) -> Option<String> {
        raw
    }

    fn filter_comment(&self, comment: NewComment) -> NewComment {
        comment
    }

    fn on_comment_inserted(&self, _comment_id: i64, _comment: &NewComment) {}

    fn on_counter_reset(&self) {}

    fn on_sweep_finished(&self, _inserted: usize) {}
}

pub struct NoHooks;

impl Hooks for NoHooks {}

pub struct BroadcastHooks {
    tx: broadcast::Sender<PipelineEvent>,
}

impl BroadcastHooks {
    pub fn new(tx: broadcast::Sender<PipelineEvent>) -> Self {
        Self { tx }
    }

    fn emit(&self, event: PipelineEvent) {
        // 没有订阅者时发送失败，忽略即可
        let _ = self.tx.send(event);
    }
}

impl Hooks for BroadcastHooks {
    fn on_comment_inserted(&self, comment_id: i64, comment: &NewComment) {
        self.emit(PipelineEvent::CommentInserted {
            comment_id,
            comment: comment.clone(),
        });
    }

    fn on_counter_reset(&self) {
        self.emit(PipelineEvent::ApiCounterReset);
    }

    fn on_sweep_finished(&self, inserted: usize) {
        self.emit(PipelineEvent::SweepFinished { inserted });
    }
}
