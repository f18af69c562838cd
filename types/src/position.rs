use std::fmt;

/// Largest absolute x or z a vanilla world allows.
pub const WORLD_BORDER: i32 = 30_000_000;

/// Integer block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by the given deltas, or `None` if any axis overflows.
    #[must_use]
    pub const fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        match (
            self.x.checked_add(dx),
            self.y.checked_add(dy),
            self.z.checked_add(dz),
        ) {
            (Some(x), Some(y), Some(z)) => Some(Self { x, y, z }),
            _ => None,
        }
    }

    /// Same column, different height.
    #[must_use]
    pub const fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::containing(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Chunk column index derived from a block's x/z.
///
/// Uses arithmetic shift so negative coordinates floor toward negative
/// infinity (block -1 lives in chunk -1, not chunk 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    #[must_use]
    pub const fn containing(position: Position) -> Self {
        Self {
            x: position.x >> 4,
            z: position.z >> 4,
        }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
