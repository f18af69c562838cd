//! YouTube Data API v3 subscriber source.

use reqwest::{Client, Error as HttpError};
use serde::Deserialize;
use url::Url;

use crate::{PollError, SubscriberSource, TriggerSettings};

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default)]
    subscriber_count: Option<CountValue>,
}

/// The API documents a string, but tolerate a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountValue {
    Text(String),
    Number(u64),
}

fn parse_count(response: ChannelListResponse) -> Result<u64, PollError> {
    let item = response
        .items
        .into_iter()
        .next()
        .ok_or(PollError::ChannelNotFound)?;
    match item.statistics.subscriber_count {
        Some(CountValue::Number(n)) => Ok(n),
        Some(CountValue::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| PollError::InvalidCount(text)),
        None => Err(PollError::InvalidCount("missing".to_string())),
    }
}

pub struct YouTubeSource {
    client: Client,
    url: Url,
}

impl YouTubeSource {
    pub fn new(settings: &TriggerSettings) -> Result<Self, PollError> {
        let url = Url::parse_with_params(
            &settings.endpoint,
            &[
                ("part", "statistics"),
                ("id", settings.channel_id.as_str()),
                ("key", settings.api_key.as_str()),
            ],
        )?;
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { client, url })
    }
}

impl SubscriberSource for YouTubeSource {
    async fn fetch(&self) -> Result<u64, PollError> {
        // Strip the URL from errors: it carries the API key.
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(HttpError::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status.as_u16()));
        }

        let body: ChannelListResponse = response
            .json()
            .await
            .map_err(HttpError::without_url)?;
        let count = parse_count(body)?;
        tracing::debug!(count, "Fetched subscriber count");
        Ok(count)
    }
}
