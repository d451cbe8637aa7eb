use crate::models::NewComment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    CommentInserted {
        comment_id: i64,
        comment: NewComment,
    },
    ApiCounterReset,
    SweepFinished {
        inserted: usize,
    },
}
