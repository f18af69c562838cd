//! Positioned block predicates.
//!
//! The remote command language only composes conditions one block at a time
//! (`execute positioned .. if|unless block ~ ~ ~ <tag>`), so a safety check is
//! a list of [`PredicateSpec`]s evaluated in order.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Position;

/// Whether a predicate passes when the block matches (`if`) or when it does not (`unless`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    If,
    Unless,
}

impl Polarity {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Unless => "unless",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockTagError {
    #[error("block tag cannot be empty")]
    Empty,
    #[error("block tag must be a single token (got {0:?})")]
    Whitespace(String),
}

/// A block id (`minecraft:air`) or block tag (`#rcon:unsafe`).
///
/// Must be a single whitespace-free token since it is spliced into a command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockTag(String);

impl BlockTag {
    pub fn new(value: impl Into<String>) -> Result<Self, BlockTagError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BlockTagError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(BlockTagError::Whitespace(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlockTag {
    type Error = BlockTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlockTag> for String {
    fn from(value: BlockTag) -> Self {
        value.0
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named block condition evaluated relative to a candidate position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSpec {
    name: &'static str,
    dy: i32,
    polarity: Polarity,
    tag: BlockTag,
}

impl PredicateSpec {
    #[must_use]
    pub fn new(name: &'static str, dy: i32, polarity: Polarity, tag: BlockTag) -> Self {
        Self {
            name,
            dy,
            polarity,
            tag,
        }
    }

    /// The fixed conjunction used to decide whether a subject can stand at a position.
    ///
    /// Floor: not `clear`, not `unsafe_tag`. Feet and head: `clear`.
    #[must_use]
    pub fn standing_checks(clear: &BlockTag, unsafe_tag: &BlockTag) -> Vec<Self> {
        vec![
            Self::new("floor_solid", -1, Polarity::Unless, clear.clone()),
            Self::new("floor_not_hazard", -1, Polarity::Unless, unsafe_tag.clone()),
            Self::new("feet_clear", 0, Polarity::If, clear.clone()),
            Self::new("head_clear", 1, Polarity::If, clear.clone()),
        ]
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn tag(&self) -> &BlockTag {
        &self.tag
    }

    /// The block this predicate inspects for a candidate at `position`.
    ///
    /// `None` when the offset leaves the coordinate range.
    #[must_use]
    pub const fn target(&self, position: Position) -> Option<Position> {
        position.checked_offset(0, self.dy, 0)
    }

    /// Render the remote command for a candidate at `position`.
    #[must_use]
    pub fn command(&self, position: Position) -> Option<String> {
        let target = self.target(position)?;
        Some(format!(
            "execute positioned {target} {} block ~ ~ ~ {}",
            self.polarity.keyword(),
            self.tag
        ))
    }
}
