mod comments;
pub(crate) mod options;
mod posts;
mod profiles;
