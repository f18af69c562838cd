//! Configuration for subhop.
//!
//! The TOML file (default `~/.subhop/config.toml`) is parsed into
//! [`SubhopConfig`], secrets are filled from `${VAR}` references and
//! environment overrides, and the result is validated into [`Settings`].
//! `Settings` is built once at startup and passed down explicitly.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use subhop_core::{SearchConfig, SearchConfigError};
use subhop_rcon::RconSettings;
use subhop_trigger::TriggerSettings;
use subhop_types::{BlockTag, BlockTagError, PredicateSpec, SubjectName, SubjectNameError};
use thiserror::Error;
use toml::de::Error as TomlError;

/// Overrides `[rcon].password`.
pub const RCON_PASSWORD_ENV: &str = "SUBHOP_RCON_PASSWORD";
/// Overrides `[trigger].api_key`.
pub const API_KEY_ENV: &str = "SUBHOP_YOUTUBE_API_KEY";

const DEFAULT_SUBJECT: &str = "Glowstudent";
const DEFAULT_TELEPORT_DELAY_SECS: u64 = 2;
const DEFAULT_CLEAR_BLOCK: &str = "minecraft:air";
const DEFAULT_UNSAFE_TAG: &str = "#rcon:unsafe";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: TomlError,
    },
    #[error("invalid [search] settings: {0}")]
    Search(#[from] SearchConfigError),
    #[error("invalid subject: {0}")]
    Subject(#[from] SubjectNameError),
    #[error("invalid block tag: {0}")]
    BlockTag(#[from] BlockTagError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Raw file contents. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SubhopConfig {
    pub app: Option<AppConfig>,
    pub rcon: Option<RconSettings>,
    pub trigger: Option<TriggerSettings>,
    pub search: Option<SearchSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Also write logs (without ANSI colors) to this file.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct SearchSection {
    pub subject: Option<String>,
    pub radius: Option<i32>,
    pub max_attempts: Option<u32>,
    pub vertical_min: Option<i32>,
    pub vertical_max: Option<i32>,
    pub teleport_delay_secs: Option<u64>,
    pub clear_block: Option<String>,
    pub unsafe_tag: Option<String>,
}

/// Validated settings for one process run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rcon: RconSettings,
    pub trigger: TriggerSettings,
    pub subject: SubjectName,
    pub search: SearchConfig,
    pub predicates: Vec<PredicateSpec>,
    pub teleport_delay: Duration,
    pub log_file: Option<PathBuf>,
}

/// Replace `${NAME}` with the value of environment variable `NAME`.
///
/// Unset variables expand to the empty string; an unterminated `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                if !name.is_empty() {
                    out.push_str(&env::var(name).unwrap_or_default());
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".subhop").join("config.toml"))
}

fn env_override(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl SubhopConfig {
    /// Parse a config file. A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(content: &str) -> Result<Self, TomlError> {
        toml::from_str(content)
    }
}

impl Settings {
    /// Load, apply environment overrides, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_config(SubhopConfig::load(path)?)
    }

    pub fn from_config(config: SubhopConfig) -> Result<Self, ConfigError> {
        let mut rcon = config.rcon.unwrap_or_default();
        rcon.password = expand_env_vars(&rcon.password);
        if let Some(password) = env_override(RCON_PASSWORD_ENV) {
            rcon.password = password;
        }
        if rcon.host.trim().is_empty() {
            return Err(ConfigError::Invalid("[rcon] host is empty".to_string()));
        }

        let mut trigger = config.trigger.unwrap_or_default();
        trigger.api_key = expand_env_vars(&trigger.api_key);
        if let Some(key) = env_override(API_KEY_ENV) {
            trigger.api_key = key;
        }
        if trigger.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "[trigger] interval_secs must be at least 1".to_string(),
            ));
        }

        let search = config.search;
        let section = search.as_ref();
        let defaults = SearchConfig::default();
        let window = defaults.vertical_window();
        let search_config = SearchConfig::new(
            section.and_then(|s| s.radius).unwrap_or(defaults.radius()),
            section
                .and_then(|s| s.max_attempts)
                .unwrap_or(defaults.max_attempts()),
            section
                .and_then(|s| s.vertical_min)
                .unwrap_or(*window.start()),
            section
                .and_then(|s| s.vertical_max)
                .unwrap_or(*window.end()),
        )?;

        let subject = SubjectName::new(
            section
                .and_then(|s| s.subject.clone())
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        )?;
        let clear = BlockTag::new(
            section
                .and_then(|s| s.clear_block.clone())
                .unwrap_or_else(|| DEFAULT_CLEAR_BLOCK.to_string()),
        )?;
        let unsafe_tag = BlockTag::new(
            section
                .and_then(|s| s.unsafe_tag.clone())
                .unwrap_or_else(|| DEFAULT_UNSAFE_TAG.to_string()),
        )?;
        let teleport_delay = Duration::from_secs(
            section
                .and_then(|s| s.teleport_delay_secs)
                .unwrap_or(DEFAULT_TELEPORT_DELAY_SECS),
        );

        Ok(Self {
            rcon,
            trigger,
            subject,
            search: search_config,
            predicates: PredicateSpec::standing_checks(&clear, &unsafe_tag),
            teleport_delay,
            log_file: config.app.and_then(|app| app.log_file),
        })
    }

    /// Polling needs a channel and key; a one-shot run does not.
    pub fn require_trigger(&self) -> Result<(), ConfigError> {
        if self.trigger.channel_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "[trigger] channel_id is required for polling".to_string(),
            ));
        }
        if self.trigger.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "[trigger] api_key (or {API_KEY_ENV}) is required for polling"
            )));
        }
        Ok(())
    }
}
