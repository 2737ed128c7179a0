//! Region detection and size filtering
//!
//! A region is a maximal set of same-state cells connected through any of the
//! 8 neighbours. Regions are found with a breadth-first flood fill and then
//! filtered by size: small wall pockets are opened up and small rooms are
//! either filled in or kept, depending on policy.

use std::collections::VecDeque;

use crate::cell::Cell;
use crate::tilemap::{Coord, Tilemap, NEIGHBOR_OFFSETS_8};

/// One connected component of a single cell state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub cell: Cell,
    pub tiles: Vec<Coord>,
}

impl Region {
    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

/// Flood-fill the region containing (start_x, start_y).
///
/// `visited` is shared across calls so every cell is enqueued at most once
/// over a full scan.
fn flood_region(
    map: &Tilemap<Cell>,
    visited: &mut Tilemap<bool>,
    start_x: usize,
    start_y: usize,
) -> Region {
    let cell = *map.get(start_x, start_y);
    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();

    queue.push_back(Coord::new(start_x as i32, start_y as i32));
    visited.set(start_x, start_y, true);

    while let Some(tile) = queue.pop_front() {
        tiles.push(tile);

        for &(dx, dy) in NEIGHBOR_OFFSETS_8.iter() {
            let nx = tile.x + dx;
            let ny = tile.y + dy;
            if !map.in_bounds(nx, ny) {
                continue;
            }
            let (ux, uy) = (nx as usize, ny as usize);
            if !*visited.get(ux, uy) && *map.get(ux, uy) == cell {
                visited.set(ux, uy, true);
                queue.push_back(Coord::new(nx, ny));
            }
        }
    }

    Region { cell, tiles }
}

/// Tiles of the region containing (x, y).
pub fn region_tiles(map: &Tilemap<Cell>, x: usize, y: usize) -> Vec<Coord> {
    let mut visited: Tilemap<bool> = Tilemap::new(map.width, map.height);
    flood_region(map, &mut visited, x, y).tiles
}

/// Partition every cell equal to `cell` into connected regions.
///
/// Regions come back in order of first discovery, scanning x outer and y inner.
pub fn find_regions(map: &Tilemap<Cell>, cell: Cell) -> Vec<Region> {
    let mut visited: Tilemap<bool> = Tilemap::new(map.width, map.height);
    let mut regions = Vec::new();

    for x in 0..map.width {
        for y in 0..map.height {
            if !*visited.get(x, y) && *map.get(x, y) == cell {
                regions.push(flood_region(map, &mut visited, x, y));
            }
        }
    }

    regions
}

/// Overwrite every tile of `region` with `cell`.
pub fn fill_region(map: &mut Tilemap<Cell>, region: &Region, cell: Cell) {
    for tile in &region.tiles {
        map.set_coord(*tile, cell);
    }
}

/// Open up wall regions smaller than `threshold`. Returns how many were removed.
pub fn filter_wall_regions(map: &mut Tilemap<Cell>, threshold: usize) -> usize {
    let mut removed = 0;
    for region in find_regions(map, Cell::Wall) {
        if region.size() < threshold {
            fill_region(map, &region, Cell::Floor);
            removed += 1;
        }
    }
    removed
}

/// Result of filtering floor regions.
#[derive(Clone, Debug, Default)]
pub struct RoomFilterOutcome {
    /// Floor regions that become rooms, in discovery order
    pub surviving: Vec<Region>,
    /// Number of small regions filled with wall
    pub removed: usize,
}

/// Filter floor regions by size.
///
/// Regions at or above `threshold` always survive. Smaller regions are filled
/// with wall when `filter_small` is set, and survive as rooms otherwise.
pub fn filter_room_regions(
    map: &mut Tilemap<Cell>,
    threshold: usize,
    filter_small: bool,
) -> RoomFilterOutcome {
    let mut outcome = RoomFilterOutcome::default();

    for region in find_regions(map, Cell::Floor) {
        if region.size() < threshold && filter_small {
            fill_region(map, &region, Cell::Wall);
            outcome.removed += 1;
        } else {
            outcome.surviving.push(region);
        }
    }

    outcome
}
