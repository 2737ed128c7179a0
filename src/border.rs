//! Solid wall frame around the finished map.

use crate::cell::Cell;
use crate::tilemap::Tilemap;

/// Copy `map` into the middle of a larger map framed by `border` tiles of wall.
pub fn add_border(map: &Tilemap<Cell>, border: usize) -> Tilemap<Cell> {
    let width = map.width + border * 2;
    let height = map.height + border * 2;
    let mut bordered = Tilemap::new_with(width, height, Cell::Wall);

    for (x, y, &cell) in map.iter() {
        bordered.set(x + border, y + border, cell);
    }

    bordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_border_is_identity() {
        let mut map = Tilemap::new_with(4, 3, Cell::Floor);
        map.set(1, 1, Cell::Wall);
        assert_eq!(add_border(&map, 0), map);
    }

    #[test]
    fn test_border_frames_interior() {
        let map = Tilemap::new_with(3, 2, Cell::Floor);
        let bordered = add_border(&map, 2);
        assert_eq!((bordered.width, bordered.height), (7, 6));
        for (x, y, &cell) in bordered.iter() {
            let inside = (2..5).contains(&x) && (2..4).contains(&y);
            assert_eq!(cell, if inside { Cell::Floor } else { Cell::Wall }, "({x}, {y})");
        }
    }
}
