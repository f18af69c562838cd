//! Event trigger: watches a subscriber count and fires on increases.
//!
//! [`SubscriberSource`] abstracts where counts come from; [`YouTubeSource`]
//! reads them from the YouTube Data API. [`SubscriberTracker`] turns the
//! sequence of readings into [`Trigger`] decisions.

mod settings;
mod tracker;
mod youtube;

pub use settings::TriggerSettings;
pub use tracker::{SubscriberTracker, Trigger};
pub use youtube::YouTubeSource;

use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("subscriber request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("subscriber endpoint returned HTTP {0}")]
    Status(u16),
    #[error("invalid subscriber endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("channel not found in response")]
    ChannelNotFound,
    #[error("subscriber count hidden or unparsable: {0}")]
    InvalidCount(String),
}

/// Anything that can report a current subscriber count.
pub trait SubscriberSource {
    fn fetch(&self) -> impl Future<Output = Result<u64, PollError>> + Send;
}
