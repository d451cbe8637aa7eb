mod authors;
mod avatar;
mod hooks;
mod host;
mod ingest;
mod insert;
mod pipeline;
mod scheduler;
mod store_impls;
mod sweep;
#[cfg(test)]
mod testing;

pub use hooks::{BroadcastHooks, Hooks, NoHooks};
pub use host::{AuthorCache, CommentStore, OptionStore, PostStore};
pub use pipeline::{Pipeline, PipelineConfig, SearchPhrase};
pub use scheduler::Scheduler;
