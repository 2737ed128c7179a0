//! Cave generation pipeline
//!
//! Runs every stage in order on a single owned grid:
//! random fill, smoothing, region filtering, room connection, passage carving
//! and finally the border frame. The finished [`CaveMap`] can be handed to any
//! [`MeshBuilder`].

use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::border::add_border;
use crate::cell::Cell;
use crate::config::CaveConfig;
use crate::error::{CaveError, Result};
use crate::generation::{random_fill, smooth};
use crate::passage::carve_passage;
use crate::regions::{filter_room_regions, filter_wall_regions};
use crate::rooms::{Passage, RoomGraph};
use crate::seeds::CaveSeed;
use crate::tilemap::Tilemap;

/// Threshold passed to mesh builders: cells at or above it are solid.
pub const MESH_WALL_THRESHOLD: i32 = 1;

/// Consumer of finished caves, e.g. a marching-squares mesh generator.
pub trait MeshBuilder {
    /// `grid` is indexed `[x][y]` with 1 for wall and 0 for floor.
    fn build_mesh(&mut self, grid: &[Vec<i32>], wall_threshold: i32);
}

/// Counts gathered while generating.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CaveStats {
    pub wall_regions_removed: usize,
    pub room_regions_removed: usize,
    pub room_count: usize,
    pub passage_count: usize,
    pub floor_tiles: usize,
    pub wall_tiles: usize,
}

/// A finished cave.
#[derive(Clone, Debug)]
pub struct CaveMap {
    pub seed: CaveSeed,
    /// Final map including the border
    pub map: Tilemap<Cell>,
    /// Border thickness; room and passage coordinates are relative to the interior
    pub border_size: usize,
    pub rooms: RoomGraph,
    pub passages: Vec<Passage>,
    pub stats: CaveStats,
}

impl CaveMap {
    pub fn width(&self) -> usize {
        self.map.width
    }

    pub fn height(&self) -> usize {
        self.map.height
    }

    /// The map as `[x][y]` integers (wall = 1, floor = 0).
    pub fn to_int_grid(&self) -> Vec<Vec<i32>> {
        (0..self.map.width)
            .map(|x| {
                (0..self.map.height)
                    .map(|y| self.map.get(x, y).as_int())
                    .collect()
            })
            .collect()
    }

    /// Pass the finished map to a mesh builder.
    pub fn build_mesh(&self, builder: &mut impl MeshBuilder) {
        builder.build_mesh(&self.to_int_grid(), MESH_WALL_THRESHOLD);
    }
}

/// Resets the in-progress flag when generation ends, including on early return.
struct GenerationGuard<'a>(&'a AtomicBool);

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Generates caves from a validated configuration.
///
/// Each call builds a fresh grid; nothing is reused between generations. A
/// generator runs one generation at a time: a call that overlaps a running one
/// fails with [`CaveError::GenerationInProgress`].
#[derive(Debug)]
pub struct CaveGenerator {
    config: CaveConfig,
    in_progress: AtomicBool,
}

impl CaveGenerator {
    pub fn new(config: CaveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            in_progress: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Generate with the configured seed (or a fresh clock seed in random mode).
    pub fn generate(&self) -> Result<CaveMap> {
        let seed = self.config.resolve_seed();
        self.generate_with_seed(seed)
    }

    /// Generate and hand the result to `builder`.
    pub fn generate_into(&self, builder: &mut impl MeshBuilder) -> Result<CaveMap> {
        let cave = self.generate()?;
        cave.build_mesh(builder);
        Ok(cave)
    }

    /// Generate with an explicit seed, ignoring the random-seed flag.
    pub fn generate_with_seed(&self, seed: CaveSeed) -> Result<CaveMap> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(CaveError::GenerationInProgress);
        }
        let _guard = GenerationGuard(&self.in_progress);

        Ok(run_pipeline(&self.config, seed))
    }
}

fn run_pipeline(config: &CaveConfig, seed: CaveSeed) -> CaveMap {
    info!(
        "Generating {}x{} cave with seed {} ({}% fill)",
        config.width, config.height, seed, config.fill_percent
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed.value);
    let mut map = random_fill(config.width, config.height, config.fill_percent, &mut rng);
    smooth(&mut map, config.smoothing_passes);

    let mut stats = CaveStats::default();

    if config.filter_small_walls {
        stats.wall_regions_removed = filter_wall_regions(&mut map, config.wall_threshold_size);
    }
    let outcome = filter_room_regions(
        &mut map,
        config.room_threshold_size,
        config.filter_small_rooms,
    );
    stats.room_regions_removed = outcome.removed;
    info!(
        "Removed {} wall regions and {} small rooms; {} rooms remain",
        stats.wall_regions_removed,
        stats.room_regions_removed,
        outcome.surviving.len()
    );

    let mut rooms = RoomGraph::from_regions(outcome.surviving, &map);
    let passages = rooms.connect_closest_rooms();
    for passage in &passages {
        carve_passage(&mut map, passage.tile_a, passage.tile_b, config.passage_radius);
    }
    info!("Carved {} passages between {} rooms", passages.len(), rooms.len());

    let map = add_border(&map, config.border_size);

    stats.room_count = rooms.len();
    stats.passage_count = passages.len();
    stats.floor_tiles = map.count(&Cell::Floor);
    stats.wall_tiles = map.count(&Cell::Wall);

    CaveMap {
        seed,
        map,
        border_size: config.border_size,
        rooms,
        passages,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_config() -> CaveConfig {
        CaveConfig {
            width: 50,
            height: 50,
            fill_percent: 45,
            seed: "test".to_string(),
            wall_threshold_size: 50,
            room_threshold_size: 50,
            border_size: 5,
            ..CaveConfig::default()
        }
    }

    #[derive(Default)]
    struct RecordingBuilder {
        calls: Vec<(usize, usize, i32)>,
    }

    impl MeshBuilder for RecordingBuilder {
        fn build_mesh(&mut self, grid: &[Vec<i32>], wall_threshold: i32) {
            self.calls.push((grid.len(), grid[0].len(), wall_threshold));
        }
    }

    #[test]
    fn test_scenario_dimensions_and_corner() {
        let cave = CaveGenerator::new(scenario_config())
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!((cave.width(), cave.height()), (60, 60));
        assert_eq!(*cave.map.get(0, 0), Cell::Wall);
    }

    #[test]
    fn test_same_parameters_same_cave() {
        let generator = CaveGenerator::new(scenario_config()).unwrap();
        let a = generator.generate().unwrap();
        let b = generator.generate().unwrap();
        assert_eq!(a.map, b.map);
        assert_eq!(a.passages, b.passages);
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        let config = CaveConfig {
            width: 2,
            height: 2,
            ..CaveConfig::default()
        };
        assert!(matches!(
            CaveGenerator::new(config),
            Err(CaveError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_maps_before_allocating() {
        let config = CaveConfig {
            width: 10_000_000_000,
            height: 10_000_000_000,
            ..CaveConfig::default()
        };
        assert!(matches!(
            CaveGenerator::new(config),
            Err(CaveError::MapTooLarge { .. })
        ));
    }

    #[test]
    fn test_every_room_reachable() {
        let cave = CaveGenerator::new(scenario_config())
            .unwrap()
            .generate()
            .unwrap();
        assert!(cave.rooms.inaccessible_rooms().is_empty());
    }

    #[test]
    fn test_mesh_builder_receives_grid() {
        let generator = CaveGenerator::new(scenario_config()).unwrap();
        let mut builder = RecordingBuilder::default();
        generator.generate_into(&mut builder).unwrap();
        assert_eq!(builder.calls, vec![(60, 60, MESH_WALL_THRESHOLD)]);
    }

    #[test]
    fn test_int_grid_is_x_major() {
        let config = CaveConfig {
            width: 10,
            height: 6,
            border_size: 1,
            ..CaveConfig::default()
        };
        let cave = CaveGenerator::new(config).unwrap().generate().unwrap();
        let grid = cave.to_int_grid();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[0].len(), 8);
        for (x, y, cell) in cave.map.iter() {
            assert_eq!(grid[x][y], cell.as_int());
        }
    }

    #[test]
    fn test_overlapping_generation_is_rejected() {
        let generator = CaveGenerator::new(scenario_config()).unwrap();
        generator.in_progress.store(true, Ordering::SeqCst);
        assert!(matches!(generator.generate(), Err(CaveError::GenerationInProgress)));
        generator.in_progress.store(false, Ordering::SeqCst);
        assert!(generator.generate().is_ok());
    }

    #[test]
    fn test_guard_clears_after_generation() {
        let generator = CaveGenerator::new(scenario_config()).unwrap();
        generator.generate().unwrap();
        assert!(!generator.in_progress.load(Ordering::SeqCst));
    }
}
