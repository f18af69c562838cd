use subhop_rcon::{CommandChannel, RconError};
use subhop_types::{Position, PredicateSpec, SafetyVerdict};

/// Reply substring for a predicate evaluated in a chunk that is not resident.
pub const NOT_LOADED_MARKER: &str = "That position is not loaded";

/// Reply substring for a predicate that held.
pub const PASSED_MARKER: &str = "passed";

/// Classify a raw predicate reply.
///
/// `None` (transport failure) and empty replies fail closed to `Unsafe`.
/// The not-loaded marker wins over `"passed"` when both appear.
#[must_use]
pub fn classify_response(response: Option<&str>) -> SafetyVerdict {
    match response {
        Some(text) if text.contains(NOT_LOADED_MARKER) => SafetyVerdict::Unloaded,
        Some(text) if text.contains(PASSED_MARKER) => SafetyVerdict::Safe,
        _ => SafetyVerdict::Unsafe,
    }
}

/// Sends commands over a caller-owned session and classifies predicate replies.
///
/// Never retries; retry policy belongs to the chunk manager and the evaluator.
pub struct WorldQueryClient<C> {
    channel: C,
    commands_sent: u64,
}

impl<C: CommandChannel> WorldQueryClient<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            commands_sent: 0,
        }
    }

    /// Send one command and return its raw reply.
    pub async fn evaluate(&mut self, command: &str) -> Result<String, RconError> {
        self.commands_sent += 1;
        self.channel.send(command).await
    }

    /// Evaluate a single predicate for a candidate position.
    ///
    /// A target outside the coordinate range is `Unsafe` without a round trip.
    pub async fn check(&mut self, spec: &PredicateSpec, position: Position) -> SafetyVerdict {
        let Some(command) = spec.command(position) else {
            tracing::debug!(predicate = spec.name(), %position, "Predicate target out of range");
            return SafetyVerdict::Unsafe;
        };
        match self.evaluate(&command).await {
            Ok(response) => classify_response(Some(&response)),
            Err(e) => {
                tracing::warn!(predicate = spec.name(), error = %e, "Predicate query failed");
                classify_response(None)
            }
        }
    }

    /// Total commands issued through this client, including failed ones.
    #[must_use]
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    pub fn into_inner(self) -> C {
        self.channel
    }
}
