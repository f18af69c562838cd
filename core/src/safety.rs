use subhop_rcon::CommandChannel;
use subhop_types::{Position, PredicateSpec, SafetyVerdict};

use crate::{ChunkLoadManager, WorldQueryClient};

/// Composes per-block predicates into one verdict for a candidate position.
pub struct SafetyPredicateEvaluator<C> {
    client: WorldQueryClient<C>,
    chunks: ChunkLoadManager,
    predicates: Vec<PredicateSpec>,
}

impl<C: CommandChannel> SafetyPredicateEvaluator<C> {
    pub fn new(client: WorldQueryClient<C>, predicates: Vec<PredicateSpec>) -> Self {
        Self {
            client,
            chunks: ChunkLoadManager::new(),
            predicates,
        }
    }

    /// Start a fresh search session: the chunk memo is session-scoped.
    pub fn begin_session(&mut self) {
        self.chunks.reset();
    }

    /// `Safe` only if every predicate resolves to `Safe`.
    ///
    /// Stops at the first predicate that does not. The result is never
    /// `Unloaded`: each predicate gets one load-and-retry, after which a still
    /// unloaded answer counts as `Unsafe`.
    pub async fn is_safe(&mut self, position: Position) -> SafetyVerdict {
        for index in 0..self.predicates.len() {
            let verdict = self.check_with_retry(index, position).await;
            if verdict != SafetyVerdict::Safe {
                tracing::trace!(
                    x = position.x,
                    y = position.y,
                    z = position.z,
                    predicate = self.predicates[index].name(),
                    %verdict,
                    "Candidate rejected"
                );
                return SafetyVerdict::Unsafe;
            }
        }
        SafetyVerdict::Safe
    }

    async fn check_with_retry(&mut self, index: usize, position: Position) -> SafetyVerdict {
        let spec = &self.predicates[index];
        let first = self.client.check(spec, position).await;
        if first != SafetyVerdict::Unloaded {
            return first;
        }

        let Some(target) = spec.target(position) else {
            return SafetyVerdict::Unsafe;
        };
        if let Err(e) = self.chunks.ensure_loaded(&mut self.client, target).await {
            tracing::warn!(error = %e, "Chunk load failed; abandoning candidate");
            return SafetyVerdict::Unsafe;
        }

        match self.client.check(spec, position).await {
            SafetyVerdict::Unloaded => {
                tracing::debug!(
                    x = target.x,
                    z = target.z,
                    "Still unloaded after forceload; abandoning candidate"
                );
                SafetyVerdict::Unsafe
            }
            verdict => verdict,
        }
    }

    #[must_use]
    pub fn chunks(&self) -> &ChunkLoadManager {
        &self.chunks
    }

    #[must_use]
    pub fn client(&self) -> &WorldQueryClient<C> {
        &self.client
    }

    pub fn into_client(self) -> WorldQueryClient<C> {
        self.client
    }
}
