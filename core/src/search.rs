//! Bounded randomized search for a safe standing position.
//!
//! # Strategy
//!
//! For each of `max_attempts` attempts:
//!
//! 1. Sample `dx, dz` uniformly in `[-radius, radius]`.
//! 2. Check the candidate at the origin's height.
//! 3. Otherwise scan `origin.y + vertical_min ..= origin.y + vertical_max` at
//!    the same column, lowest offset first.
//!
//! The first safe position wins. Attempts are independent; a column may be
//! sampled twice. Candidates whose coordinates would overflow are skipped
//! without a probe.

use std::ops::RangeInclusive;

use subhop_rcon::CommandChannel;
use subhop_types::{Position, WORLD_BORDER};
use thiserror::Error;

use crate::SafetyPredicateEvaluator;

pub const DEFAULT_RADIUS: i32 = 100;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_VERTICAL_MIN: i32 = -5;
pub const DEFAULT_VERTICAL_MAX: i32 = 9;
/// Bound on either end of the vertical window.
pub const MAX_VERTICAL_OFFSET: i32 = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchConfigError {
    #[error("search radius must be non-negative (got {0})")]
    NegativeRadius(i32),
    #[error("search radius {0} exceeds the world border ({WORLD_BORDER})")]
    RadiusTooLarge(i32),
    #[error("max_attempts must be at least 1")]
    NoAttempts,
    #[error("vertical window is empty ({min}..={max})")]
    EmptyWindow { min: i32, max: i32 },
    #[error("vertical window {min}..={max} reaches past ±{MAX_VERTICAL_OFFSET}")]
    WindowTooTall { min: i32, max: i32 },
}

/// Fixed search bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    radius: i32,
    max_attempts: u32,
    vertical_min: i32,
    vertical_max: i32,
}

impl SearchConfig {
    pub fn new(
        radius: i32,
        max_attempts: u32,
        vertical_min: i32,
        vertical_max: i32,
    ) -> Result<Self, SearchConfigError> {
        if radius < 0 {
            return Err(SearchConfigError::NegativeRadius(radius));
        }
        if radius > WORLD_BORDER {
            return Err(SearchConfigError::RadiusTooLarge(radius));
        }
        if max_attempts == 0 {
            return Err(SearchConfigError::NoAttempts);
        }
        if vertical_min > vertical_max {
            return Err(SearchConfigError::EmptyWindow {
                min: vertical_min,
                max: vertical_max,
            });
        }
        if vertical_min < -MAX_VERTICAL_OFFSET || vertical_max > MAX_VERTICAL_OFFSET {
            return Err(SearchConfigError::WindowTooTall {
                min: vertical_min,
                max: vertical_max,
            });
        }
        Ok(Self {
            radius,
            max_attempts,
            vertical_min,
            vertical_max,
        })
    }

    #[must_use]
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn vertical_window(&self) -> RangeInclusive<i32> {
        self.vertical_min..=self.vertical_max
    }

    /// Number of offsets in the vertical window.
    #[must_use]
    pub const fn window_len(&self) -> u64 {
        (self.vertical_max as i64 - self.vertical_min as i64 + 1) as u64
    }

    /// Upper bound on safety evaluations for one search.
    #[must_use]
    pub const fn max_probes(&self) -> u64 {
        self.max_attempts as u64 * (1 + self.window_len())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            vertical_min: DEFAULT_VERTICAL_MIN,
            vertical_max: DEFAULT_VERTICAL_MAX,
        }
    }
}

/// Source of horizontal offsets. Each component must lie in `[-radius, radius]`.
pub trait OffsetSampler {
    fn sample(&mut self, radius: i32) -> (i32, i32);
}

/// Uniform offsets from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOffsets;

impl OffsetSampler for RandomOffsets {
    fn sample(&mut self, radius: i32) -> (i32, i32) {
        (
            rand::random_range(-radius..=radius),
            rand::random_range(-radius..=radius),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("subject not found")]
    SubjectNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Position),
    /// Every attempt was exhausted. A definitive negative, not a failure.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Attempts started, including the successful one.
    pub attempts: u32,
    /// Candidate positions evaluated.
    pub probes: u64,
}

impl SearchReport {
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self.outcome {
            SearchOutcome::Found(position) => Some(position),
            SearchOutcome::NotFound => None,
        }
    }
}

/// State for one search invocation. Dropped when the search returns.
struct SearchSession {
    origin: Position,
    attempts: u32,
    probes: u64,
}

impl SearchSession {
    fn report(&self, outcome: SearchOutcome) -> SearchReport {
        SearchReport {
            outcome,
            attempts: self.attempts,
            probes: self.probes,
        }
    }
}

pub struct LocationSearchEngine<C, S = RandomOffsets> {
    evaluator: SafetyPredicateEvaluator<C>,
    config: SearchConfig,
    sampler: S,
}

impl<C: CommandChannel> LocationSearchEngine<C, RandomOffsets> {
    pub fn new(evaluator: SafetyPredicateEvaluator<C>, config: SearchConfig) -> Self {
        Self::with_sampler(evaluator, config, RandomOffsets)
    }
}

impl<C: CommandChannel, S: OffsetSampler> LocationSearchEngine<C, S> {
    pub fn with_sampler(
        evaluator: SafetyPredicateEvaluator<C>,
        config: SearchConfig,
        sampler: S,
    ) -> Self {
        Self {
            evaluator,
            config,
            sampler,
        }
    }

    /// Find a safe position near `origin`.
    ///
    /// `None` means the subject's position is unknown; the search fails
    /// immediately without probing. Otherwise the search always completes with
    /// a report, performing at most [`SearchConfig::max_probes`] evaluations.
    pub async fn find_safe_location(
        &mut self,
        origin: Option<Position>,
    ) -> Result<SearchReport, SearchError> {
        let Some(origin) = origin else {
            tracing::warn!("Subject position unknown; skipping search");
            return Err(SearchError::SubjectNotFound);
        };

        self.evaluator.begin_session();
        let mut session = SearchSession {
            origin,
            attempts: 0,
            probes: 0,
        };
        tracing::info!(
            x = origin.x,
            y = origin.y,
            z = origin.z,
            radius = self.config.radius(),
            max_attempts = self.config.max_attempts(),
            "Searching for safe location"
        );

        while session.attempts < self.config.max_attempts() {
            session.attempts += 1;
            let (dx, dz) = self.sampler.sample(self.config.radius());
            let Some(column) = session.origin.checked_offset(dx, 0, dz) else {
                tracing::debug!(attempt = session.attempts, dx, dz, "Column out of range");
                continue;
            };
            tracing::debug!(
                attempt = session.attempts,
                x = column.x,
                z = column.z,
                "Trying column"
            );

            if let Some(found) = self.search_column(&mut session, column).await {
                tracing::info!(
                    x = found.x,
                    y = found.y,
                    z = found.z,
                    attempt = session.attempts,
                    probes = session.probes,
                    "Found safe location"
                );
                return Ok(session.report(SearchOutcome::Found(found)));
            }
        }

        tracing::warn!(
            attempts = session.attempts,
            probes = session.probes,
            "Could not find a safe location"
        );
        Ok(session.report(SearchOutcome::NotFound))
    }

    async fn search_column(
        &mut self,
        session: &mut SearchSession,
        column: Position,
    ) -> Option<Position> {
        if self.probe(session, column).await {
            return Some(column);
        }
        for dy in self.config.vertical_window() {
            let Some(y) = session.origin.y.checked_add(dy) else {
                continue;
            };
            let candidate = column.with_y(y);
            if self.probe(session, candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    async fn probe(&mut self, session: &mut SearchSession, candidate: Position) -> bool {
        session.probes += 1;
        self.evaluator.is_safe(candidate).await.is_safe()
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn evaluator(&self) -> &SafetyPredicateEvaluator<C> {
        &self.evaluator
    }
}
