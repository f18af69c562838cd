//! Search engine scenarios against a synthetic world

use subhop_core::{
    LocationSearchEngine, OffsetSampler, SafetyPredicateEvaluator, SearchConfig, SearchError,
    SearchOutcome, WorldQueryClient,
};
use subhop_types::{BlockTag, ChunkCoord, Position, PredicateSpec};

use crate::common::{Block, SyntheticWorld};

fn standing_checks() -> Vec<PredicateSpec> {
    PredicateSpec::standing_checks(
        &BlockTag::new("minecraft:air").unwrap(),
        &BlockTag::new("#rcon:unsafe").unwrap(),
    )
}

fn engine(
    world: &mut SyntheticWorld,
    config: SearchConfig,
) -> LocationSearchEngine<&mut SyntheticWorld> {
    LocationSearchEngine::new(
        SafetyPredicateEvaluator::new(WorldQueryClient::new(world), standing_checks()),
        config,
    )
}

/// Replays a fixed list of offsets, then repeats the last one.
struct Scripted(Vec<(i32, i32)>);

impl OffsetSampler for Scripted {
    fn sample(&mut self, _radius: i32) -> (i32, i32) {
        if self.0.len() > 1 {
            self.0.remove(0)
        } else {
            self.0[0]
        }
    }
}

#[tokio::test]
async fn flat_world_is_found_on_first_attempt() {
    let mut world = SyntheticWorld::flat(64);
    let report = engine(&mut world, SearchConfig::default())
        .find_safe_location(Some(Position::new(0, 64, 0)))
        .await
        .unwrap();

    let found = report.position().expect("flat world has a safe spot everywhere");
    assert_eq!(report.attempts, 1);
    assert_eq!(report.probes, 1);
    assert!(found.x.abs() <= 100);
    assert!(found.z.abs() <= 100);
    assert_eq!(found.y, 64);
}

#[tokio::test]
async fn sampled_offsets_stay_within_radius() {
    // Nothing is ever safe, so every attempt samples a fresh column.
    let mut world = SyntheticWorld::new(|_| Block::Air);
    let origin = Position::new(-500, 70, 1200);
    let config = SearchConfig::new(7, 50, 0, 0).unwrap();
    engine(&mut world, config)
        .find_safe_location(Some(origin))
        .await
        .unwrap();

    let columns = world.probed_columns();
    assert_eq!(columns.len(), 50 * 2);
    for column in columns {
        assert!((column.x - origin.x).abs() <= 7, "x out of range: {column}");
        assert!((column.z - origin.z).abs() <= 7, "z out of range: {column}");
    }
}

#[tokio::test]
async fn nothing_safe_returns_not_found_after_max_attempts() {
    let mut world = SyntheticWorld::new(|_| Block::Air);
    let config = SearchConfig::default();
    let report = engine(&mut world, config.clone())
        .find_safe_location(Some(Position::new(0, 64, 0)))
        .await
        .unwrap();

    assert_eq!(report.outcome, SearchOutcome::NotFound);
    assert_eq!(report.attempts, config.max_attempts());
    assert_eq!(report.probes, config.max_probes());
}

#[tokio::test]
async fn hazard_floor_is_skipped_for_next_safe_height() {
    // Lava at 63, stone at 66, air elsewhere: standing on the stone is the only option.
    let mut world = SyntheticWorld::new(|p| match p.y {
        63 => Block::Hazard,
        66 => Block::Solid,
        _ => Block::Air,
    });
    let report = LocationSearchEngine::with_sampler(
        SafetyPredicateEvaluator::new(WorldQueryClient::new(&mut world), standing_checks()),
        SearchConfig::default(),
        Scripted(vec![(3, 4)]),
    )
    .find_safe_location(Some(Position::new(0, 64, 0)))
    .await
    .unwrap();

    assert_eq!(report.position(), Some(Position::new(3, 67, 4)));
}

#[tokio::test]
async fn lowest_safe_offset_wins() {
    // Two floors in the window: 60 and 68. Standing heights 61 and 69.
    let mut world = SyntheticWorld::new(|p| match p.y {
        60 | 68 => Block::Solid,
        _ => Block::Air,
    });
    let report = LocationSearchEngine::with_sampler(
        SafetyPredicateEvaluator::new(WorldQueryClient::new(&mut world), standing_checks()),
        SearchConfig::default(),
        Scripted(vec![(0, 0)]),
    )
    .find_safe_location(Some(Position::new(0, 64, 0)))
    .await
    .unwrap();

    assert_eq!(report.position(), Some(Position::new(0, 61, 0)));
}

#[tokio::test]
async fn unloaded_chunk_is_loaded_once_then_found() {
    let mut world = SyntheticWorld::flat(64);
    let target_chunk = Position::new(40, 0, 40).chunk();
    world.unloaded.insert(target_chunk);

    let report = LocationSearchEngine::with_sampler(
        SafetyPredicateEvaluator::new(WorldQueryClient::new(&mut world), standing_checks()),
        SearchConfig::default(),
        Scripted(vec![(40, 40)]),
    )
    .find_safe_location(Some(Position::new(0, 64, 0)))
    .await
    .unwrap();

    assert_eq!(report.position(), Some(Position::new(40, 64, 40)));
    assert_eq!(report.probes, 1);
    assert_eq!(world.add_requests.get(&target_chunk), Some(&1));
    assert_eq!(world.total_add_requests(), 1);
}

#[tokio::test]
async fn permanently_unloaded_world_terminates() {
    let mut world = SyntheticWorld::flat(64);
    world.stubborn = true;
    for x in -8..=8 {
        for z in -8..=8 {
            world.unloaded.insert(ChunkCoord { x, z });
        }
    }

    let config = SearchConfig::new(100, 5, -5, 9).unwrap();
    let report = engine(&mut world, config.clone())
        .find_safe_location(Some(Position::new(0, 64, 0)))
        .await
        .unwrap();

    assert_eq!(report.outcome, SearchOutcome::NotFound);
    assert_eq!(report.probes, config.max_probes());
    // At most one load request per chunk within the session.
    assert!(world.add_requests.values().all(|&n| n == 1));
    assert!(world.total_add_requests() <= config.max_attempts());
}

#[tokio::test]
async fn transport_failures_resolve_to_not_found() {
    let mut world = SyntheticWorld::flat(64);
    world.fail_all = true;

    let config = SearchConfig::new(10, 3, 0, 1).unwrap();
    let report = engine(&mut world, config)
        .find_safe_location(Some(Position::new(0, 64, 0)))
        .await
        .unwrap();
    assert_eq!(report.outcome, SearchOutcome::NotFound);
}

#[tokio::test]
async fn unknown_origin_is_subject_not_found() {
    let mut world = SyntheticWorld::flat(64);
    let result = engine(&mut world, SearchConfig::default())
        .find_safe_location(None)
        .await;
    assert_eq!(result, Err(SearchError::SubjectNotFound));
    assert!(world.log.is_empty());
}
