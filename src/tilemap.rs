//! Bounded 2D grid used by every generation stage.

use serde::{Deserialize, Serialize};

/// A tile position on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another tile.
    pub fn distance_squared(&self, other: Coord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Offsets for the 8 surrounding cells, x outer and y inner.
pub const NEIGHBOR_OFFSETS_8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Offsets for the 4 axis-aligned neighbours (left, down, up, right).
pub const NEIGHBOR_OFFSETS_4: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// A 2D tilemap grid. Unlike a world map it does not wrap at any edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "tile ({x}, {y}) out of range");
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// True when (x, y) lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Bounds-checked lookup with signed coordinates.
    pub fn get_checked(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn get_coord(&self, coord: Coord) -> Option<&T> {
        self.get_checked(coord.x, coord.y)
    }

    /// Write a value at `coord`. Returns false and leaves the map untouched
    /// when the coordinate is outside the grid.
    pub fn set_coord(&mut self, coord: Coord, value: T) -> bool {
        if self.in_bounds(coord.x, coord.y) {
            self.set(coord.x as usize, coord.y as usize, value);
            true
        } else {
            false
        }
    }

    /// Iterate over all cells with their coordinates (row-major).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Number of cells equal to `value`.
    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.data.iter().filter(|v| *v == value).count()
    }
}

/// Map from rows of text: `#` is wall, anything else floor.
#[cfg(test)]
pub(crate) fn map_from_rows(rows: &[&str]) -> Tilemap<crate::cell::Cell> {
    use crate::cell::Cell;

    let mut map = Tilemap::new_with(rows[0].len(), rows.len(), Cell::Wall);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            map.set(x, y, if ch == '#' { Cell::Wall } else { Cell::Floor });
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds_rejects_negative_and_far_edges() {
        let map = Tilemap::new_with(4, 3, 0u8);
        assert!(map.in_bounds(0, 0));
        assert!(map.in_bounds(3, 2));
        assert!(!map.in_bounds(-1, 0));
        assert!(!map.in_bounds(0, -1));
        assert!(!map.in_bounds(4, 0));
        assert!(!map.in_bounds(0, 3));
    }

    #[test]
    fn test_get_checked_and_set_coord() {
        let mut map = Tilemap::new_with(3, 3, 0u8);
        assert!(map.set_coord(Coord::new(2, 1), 7));
        assert!(!map.set_coord(Coord::new(3, 1), 9));
        assert_eq!(map.get_checked(2, 1), Some(&7));
        assert_eq!(map.get_checked(5, 5), None);
        assert_eq!(map.count(&7), 1);
    }

    #[test]
    fn test_iter_is_row_major() {
        let map = Tilemap::new_with(2, 2, 1u8);
        let coords: Vec<(usize, usize)> = map.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_distance_squared() {
        assert_eq!(Coord::new(0, 0).distance_squared(Coord::new(3, 4)), 25);
        assert_eq!(Coord::new(-2, 1).distance_squared(Coord::new(-2, 1)), 0);
    }
}
