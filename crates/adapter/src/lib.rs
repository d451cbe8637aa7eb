mod error;
mod traits;
mod twitter;

pub use error::SourceError;
pub use traits::MentionSource;
pub use twitter::{TwitterClient, TwitterConfig};
