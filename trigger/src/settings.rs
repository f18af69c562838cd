use std::fmt;
use std::time::Duration;

use serde::Deserialize;

pub const YOUTUBE_CHANNELS_URL: &str = "https://www.googleapis.com/youtube/v3/channels";
const DEFAULT_INTERVAL_SECS: u64 = 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

fn default_endpoint() -> String {
    YOUTUBE_CHANNELS_URL.to_string()
}

const fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Clone, Deserialize)]
pub struct TriggerSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub channel_id: String,
    /// Seconds between polls.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl TriggerSettings {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            channel_id: String::new(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            endpoint: default_endpoint(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// Manual Debug impl to prevent leaking the API key in logs.
impl fmt::Debug for TriggerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "None"
        } else {
            "[REDACTED]"
        };
        f.debug_struct("TriggerSettings")
            .field("api_key", &api_key)
            .field("channel_id", &self.channel_id)
            .field("interval_secs", &self.interval_secs)
            .field("endpoint", &self.endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
