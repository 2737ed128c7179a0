//! Corridor carving between two tiles
//!
//! The line between the endpoints is stepped one cell at a time along the
//! dominant axis, with an error accumulator deciding when to step the minor
//! axis. A floor disk is stamped at every point of the line.

use crate::cell::Cell;
use crate::tilemap::{Coord, Tilemap};

/// Integer line from `from` to `to`, both endpoints included.
pub fn line_between(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    // Walk the longer axis; `inverted` means that axis is y.
    let inverted = dx.abs() < dy.abs();
    let (longest, shortest, step, gradient_step) = if inverted {
        (dy.abs(), dx.abs(), dy.signum(), dx.signum())
    } else {
        (dx.abs(), dy.abs(), dx.signum(), dy.signum())
    };

    let mut line = Vec::with_capacity(longest as usize + 1);
    let mut x = from.x;
    let mut y = from.y;
    let mut gradient_accumulation = longest / 2;

    for _ in 0..longest {
        line.push(Coord::new(x, y));

        if inverted {
            y += step;
        } else {
            x += step;
        }

        gradient_accumulation += shortest;
        if gradient_accumulation >= longest {
            if inverted {
                x += gradient_step;
            } else {
                y += gradient_step;
            }
            gradient_accumulation -= longest;
        }
    }

    line.push(to);
    line
}

/// Set every tile within `radius` of `center` to floor, clipped to the map.
pub fn carve_disk(map: &mut Tilemap<Cell>, center: Coord, radius: i32) {
    let radius = radius.max(0);
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                map.set_coord(Coord::new(center.x + dx, center.y + dy), Cell::Floor);
            }
        }
    }
}

/// Carve a walkable corridor of the given radius from `from` to `to`.
/// Only ever turns wall into floor.
pub fn carve_passage(map: &mut Tilemap<Cell>, from: Coord, to: Coord, radius: i32) {
    for point in line_between(from, to) {
        carve_disk(map, point, radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_continuous(line: &[Coord]) -> bool {
        line.windows(2)
            .all(|w| (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1)
    }

    #[test]
    fn test_horizontal_line() {
        let line = line_between(Coord::new(1, 2), Coord::new(5, 2));
        assert_eq!(line.len(), 5);
        assert!(line.iter().all(|c| c.y == 2));
    }

    #[test]
    fn test_single_point_line() {
        let line = line_between(Coord::new(3, 3), Coord::new(3, 3));
        assert_eq!(line, vec![Coord::new(3, 3)]);
    }

    #[test]
    #[rustfmt::skip]
    fn test_all_octants_reach_the_endpoint() {
        let origin = Coord::new(0, 0);
        let targets = [
            (7, 3), (3, 7), (-3, 7), (-7, 3),
            (-7, -3), (-3, -7), (3, -7), (7, -3),
            (5, 5), (-5, 5), (0, -6), (-6, 0),
        ];
        for (tx, ty) in targets {
            let to = Coord::new(tx, ty);
            let line = line_between(origin, to);
            assert_eq!(line.first(), Some(&origin));
            assert_eq!(line.last(), Some(&to));
            assert_eq!(line.len() as i32, tx.abs().max(ty.abs()) + 1, "target {to}");
            assert!(is_continuous(&line), "gap in line to {to}");
        }
    }

    #[test]
    fn test_disk_is_clipped_to_map() {
        let mut map = Tilemap::new_with(5, 5, Cell::Wall);
        carve_disk(&mut map, Coord::new(0, 0), 2);
        // Quarter disk of radius 2: (0,0) (1,0) (2,0) (0,1) (1,1) (0,2)
        assert_eq!(map.count(&Cell::Floor), 6);
    }

    #[test]
    fn test_zero_radius_carves_the_line() {
        let mut map = Tilemap::new_with(8, 8, Cell::Wall);
        carve_passage(&mut map, Coord::new(1, 1), Coord::new(6, 4), 0);
        assert_eq!(*map.get(1, 1), Cell::Floor);
        assert_eq!(*map.get(6, 4), Cell::Floor);
        assert_eq!(map.count(&Cell::Floor), 6);
    }

    #[test]
    fn test_carving_is_idempotent() {
        let mut once = Tilemap::new_with(20, 20, Cell::Wall);
        carve_passage(&mut once, Coord::new(2, 3), Coord::new(17, 12), 2);
        let mut twice = once.clone();
        carve_passage(&mut twice, Coord::new(2, 3), Coord::new(17, 12), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_carving_never_adds_walls() {
        let mut map = Tilemap::new_with(10, 10, Cell::Floor);
        carve_passage(&mut map, Coord::new(0, 0), Coord::new(9, 9), 3);
        assert_eq!(map.count(&Cell::Wall), 0);
    }
}
