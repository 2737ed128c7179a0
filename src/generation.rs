//! Initial noise fill and cellular-automaton smoothing
//!
//! The map starts as random wall/floor noise with a solid outer ring, then a
//! few smoothing passes pull walls and floors into organic cave shapes.

use rand::Rng;

use crate::cell::Cell;
use crate::tilemap::{Tilemap, NEIGHBOR_OFFSETS_8};

/// Number of wall neighbours above which a cell becomes wall (below it, floor).
pub const SMOOTHING_PIVOT: usize = 4;

/// Fill a `width x height` map with random walls.
///
/// Border cells are always wall. Each interior cell is wall when a roll in
/// `0..100` lands below `fill_percent`. Cells are visited column by column
/// (x outer, y inner) so the RNG stream maps to the same tiles on every run.
pub fn random_fill<R: Rng>(
    width: usize,
    height: usize,
    fill_percent: u32,
    rng: &mut R,
) -> Tilemap<Cell> {
    let mut map = Tilemap::new_with(width, height, Cell::Wall);

    for x in 0..width {
        for y in 0..height {
            let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let cell = if on_border || rng.gen_range(0..100) < fill_percent {
                Cell::Wall
            } else {
                Cell::Floor
            };
            map.set(x, y, cell);
        }
    }

    map
}

/// Count walls among the 8 neighbours of (x, y). Neighbours outside the map
/// count as wall.
pub fn surrounding_wall_count(map: &Tilemap<Cell>, x: usize, y: usize) -> usize {
    NEIGHBOR_OFFSETS_8
        .iter()
        .filter(|&&(dx, dy)| {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            map.get_checked(nx, ny).map_or(true, |cell| cell.is_wall())
        })
        .count()
}

/// One smoothing pass. Every cell is decided from `map` as it was before the
/// pass; the result is written to a fresh buffer.
pub fn smooth_map(map: &Tilemap<Cell>) -> Tilemap<Cell> {
    let mut next = map.clone();

    for x in 0..map.width {
        for y in 0..map.height {
            let walls = surrounding_wall_count(map, x, y);
            if walls > SMOOTHING_PIVOT {
                next.set(x, y, Cell::Wall);
            } else if walls < SMOOTHING_PIVOT {
                next.set(x, y, Cell::Floor);
            }
        }
    }

    next
}

/// Run `passes` smoothing passes in place.
pub fn smooth(map: &mut Tilemap<Cell>, passes: usize) {
    for _ in 0..passes {
        *map = smooth_map(map);
    }
}
