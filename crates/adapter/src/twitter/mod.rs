mod client;
mod wire;

pub use client::{TwitterClient, TwitterConfig};
