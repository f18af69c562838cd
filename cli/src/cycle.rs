//! One search-and-teleport cycle.

use subhop_config::Settings;
use subhop_core::{
    LocationSearchEngine, OffsetSampler, RandomOffsets, SafetyPredicateEvaluator, SearchError,
    WorldQueryClient, lookup_position, teleport,
};
use subhop_rcon::{CommandChannel, RconError, RconSession};
use subhop_types::Position;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Teleported(Position),
    /// Search exhausted; the subject stays where it is.
    NotFound { attempts: u32 },
    /// The subject is offline, its position could not be read, or it left
    /// before the teleport landed.
    SubjectNotFound,
}

/// Look up the subject, search around it, and teleport on success.
///
/// Only transport failures during lookup or teleport are errors. Failures
/// inside the search resolve to unsafe candidates.
pub async fn search_and_teleport<C, S>(
    channel: &mut C,
    settings: &Settings,
    sampler: S,
) -> Result<CycleOutcome, RconError>
where
    C: CommandChannel,
    S: OffsetSampler,
{
    let origin = lookup_position(channel, &settings.subject).await?;

    let report = {
        let evaluator = SafetyPredicateEvaluator::new(
            WorldQueryClient::new(&mut *channel),
            settings.predicates.clone(),
        );
        let mut engine =
            LocationSearchEngine::with_sampler(evaluator, settings.search.clone(), sampler);
        match engine.find_safe_location(origin).await {
            Ok(report) => report,
            Err(SearchError::SubjectNotFound) => return Ok(CycleOutcome::SubjectNotFound),
        }
    };

    let Some(target) = report.position() else {
        return Ok(CycleOutcome::NotFound {
            attempts: report.attempts,
        });
    };

    if !settings.teleport_delay.is_zero() {
        sleep(settings.teleport_delay).await;
    }
    if !teleport(channel, &settings.subject, target).await? {
        return Ok(CycleOutcome::SubjectNotFound);
    }
    Ok(CycleOutcome::Teleported(target))
}

/// Full cycle against the configured server: connect, search, teleport, disconnect.
pub async fn run_cycle(settings: &Settings) -> Result<CycleOutcome, RconError> {
    let mut session = RconSession::connect(&settings.rcon).await?;
    let result = search_and_teleport(&mut session, settings, RandomOffsets).await;
    if let Err(e) = session.disconnect().await {
        tracing::debug!(error = %e, "RCON disconnect failed");
    }
    result
}
