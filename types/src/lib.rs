//! Core domain types for subhop.
//!
//! This crate contains pure world-coordinate and safety types with no IO and no
//! async. Everything here can be used from any layer of the application.

mod position;
mod predicate;
mod subject;

pub use position::{ChunkCoord, Position, WORLD_BORDER};
pub use predicate::{BlockTag, BlockTagError, Polarity, PredicateSpec};
pub use subject::{SubjectName, SubjectNameError};

use std::fmt;

// ============================================================================
// Safety verdict
// ============================================================================

/// Tri-state classification of a predicate or composite safety check.
///
/// `Unloaded` is neither a pass nor a fail: it means the remote world could not
/// answer because the chunk is not resident. Callers must resolve it (load and
/// retry) before treating the position as safe or unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyVerdict {
    Safe,
    Unsafe,
    Unloaded,
}

impl SafetyVerdict {
    #[must_use]
    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Safe)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Unsafe => "unsafe",
            Self::Unloaded => "unloaded",
        }
    }
}

impl fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
