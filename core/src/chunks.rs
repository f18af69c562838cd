//! Force-loading of chunks that answered "not loaded".
//!
//! Chunks added here are never released. Forceloaded chunks persist until
//! cleared externally, which keeps them stable across the retry window at the
//! cost of server memory.

use std::collections::HashSet;

use subhop_rcon::{CommandChannel, RconError};
use subhop_types::{ChunkCoord, Position};

use crate::WorldQueryClient;

/// Reply substring for `forceload query` when the chunk is not force-loaded.
const NOT_MARKED_MARKER: &str = "is not marked";

/// What [`ChunkLoadManager::ensure_loaded`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Already confirmed earlier in this session; no remote call made.
    Memoized,
    /// Server reported the chunk as already force-loaded.
    AlreadyLoaded,
    /// A `forceload add` was issued.
    Requested,
}

/// Session-scoped memo of chunks confirmed resident.
#[derive(Debug, Default)]
pub struct ChunkLoadManager {
    confirmed: HashSet<ChunkCoord>,
    load_requests: u32,
}

impl ChunkLoadManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every confirmation. Called at the start of a search session.
    pub fn reset(&mut self) {
        self.confirmed.clear();
        self.load_requests = 0;
    }

    /// Make sure the chunk containing `position` is force-loaded.
    ///
    /// Idempotent per chunk within a session: once a chunk is confirmed, later
    /// calls return [`LoadOutcome::Memoized`] without touching the server. A
    /// transport failure leaves the chunk unconfirmed.
    pub async fn ensure_loaded<C: CommandChannel>(
        &mut self,
        client: &mut WorldQueryClient<C>,
        position: Position,
    ) -> Result<LoadOutcome, RconError> {
        let chunk = position.chunk();
        if self.confirmed.contains(&chunk) {
            return Ok(LoadOutcome::Memoized);
        }

        let query = format!("forceload query {} {}", position.x, position.z);
        let state = client.evaluate(&query).await?;

        let outcome = if state.contains(NOT_MARKED_MARKER) {
            let add = format!(
                "forceload add {x} {z} {x} {z}",
                x = position.x,
                z = position.z
            );
            client.evaluate(&add).await?;
            self.load_requests += 1;
            tracing::info!(chunk_x = chunk.x, chunk_z = chunk.z, "Force-loaded chunk");
            LoadOutcome::Requested
        } else {
            LoadOutcome::AlreadyLoaded
        };

        self.confirmed.insert(chunk);
        Ok(outcome)
    }

    /// `forceload add` commands issued this session.
    #[must_use]
    pub fn load_requests(&self) -> u32 {
        self.load_requests
    }

    #[must_use]
    pub fn is_confirmed(&self, chunk: ChunkCoord) -> bool {
        self.confirmed.contains(&chunk)
    }
}
