//! Cell states of the cave grid.

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Cell {
    /// Impassable rock
    #[default]
    Wall,
    /// Walkable ground
    Floor,
}

impl Cell {
    /// Integer encoding handed to mesh builders (Wall = 1, Floor = 0).
    pub fn as_int(self) -> i32 {
        match self {
            Cell::Wall => 1,
            Cell::Floor => 0,
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    pub fn is_floor(self) -> bool {
        self == Cell::Floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_encoding() {
        assert_eq!(Cell::Wall.as_int(), 1);
        assert_eq!(Cell::Floor.as_int(), 0);
    }
}
