mod events;
mod models;
mod options;
pub mod protocol;

pub use events::PipelineEvent;
pub use models::{Comment, Mention, MentionId, MentionIdError, MentionPage, NewComment, Post, Profile};
pub use options::{version_before, Options, OptionsError, SCHEMA_VERSION};
