use std::fmt;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 25575;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection parameters for one RCON endpoint.
#[derive(Clone, Deserialize)]
pub struct RconSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub password: String,
    /// Upper bound for connect and for each packet read/write.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RconSettings {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for RconSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            password: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Manual Debug impl to prevent leaking the password in logs.
impl fmt::Debug for RconSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() {
            "None"
        } else {
            "[REDACTED]"
        };
        f.debug_struct("RconSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &password)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
