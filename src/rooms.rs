//! Room graph and room connection
//!
//! Every floor region that survives filtering becomes a [`Room`]. Rooms live in
//! a [`RoomGraph`] and refer to each other by index. Connecting works in two
//! phases:
//!
//! 1. Every room without connections is linked to its nearest room.
//! 2. While some rooms are unreachable from the main room, the closest pair
//!    (one unreachable, one reachable) is linked.
//!
//! Distances are squared Euclidean distances between edge tiles. Ties go to
//! the first pair found: rooms in graph order (largest first), then edge tiles
//! of the first room in order, then edge tiles of the second room in order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell::Cell;
use crate::regions::Region;
use crate::tilemap::{Coord, Tilemap, NEIGHBOR_OFFSETS_4};

/// Index of a room inside its [`RoomGraph`].
pub type RoomId = usize;

/// A surviving floor region promoted to a graph node.
#[derive(Clone, Debug)]
pub struct Room {
    pub id: RoomId,
    pub tiles: Vec<Coord>,
    /// Member tiles with a wall (or the map edge) directly left, right, above or below
    pub edge_tiles: Vec<Coord>,
    pub size: usize,
    pub is_main_room: bool,
    pub is_accessible_from_main_room: bool,
    /// Rooms this one shares a passage with
    pub connected_rooms: BTreeSet<RoomId>,
}

impl Room {
    pub fn new(id: RoomId, tiles: Vec<Coord>, map: &Tilemap<Cell>) -> Self {
        let edge_tiles = edge_tiles(&tiles, map);
        let size = tiles.len();
        Self {
            id,
            tiles,
            edge_tiles,
            size,
            is_main_room: false,
            is_accessible_from_main_room: false,
            connected_rooms: BTreeSet::new(),
        }
    }

    pub fn is_connected(&self, other: RoomId) -> bool {
        self.connected_rooms.contains(&other)
    }
}

/// Tiles from `tiles` that touch a wall through one of their 4 axis-aligned
/// neighbours. Neighbours outside the map count as wall.
pub fn edge_tiles(tiles: &[Coord], map: &Tilemap<Cell>) -> Vec<Coord> {
    tiles
        .iter()
        .copied()
        .filter(|tile| {
            NEIGHBOR_OFFSETS_4.iter().any(|&(dx, dy)| {
                map.get_checked(tile.x + dx, tile.y + dy)
                    .map_or(true, |cell| cell.is_wall())
            })
        })
        .collect()
}

/// A planned corridor between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub room_a: RoomId,
    pub room_b: RoomId,
    pub tile_a: Coord,
    pub tile_b: Coord,
    pub distance_squared: i64,
}

/// All rooms of one cave plus their connections.
#[derive(Clone, Debug, Default)]
pub struct RoomGraph {
    pub rooms: Vec<Room>,
}

impl RoomGraph {
    /// Build rooms from surviving regions.
    ///
    /// Rooms are sorted by descending size (stable, so equal sizes keep
    /// discovery order) and the first one becomes the main room.
    pub fn from_regions(regions: Vec<Region>, map: &Tilemap<Cell>) -> Self {
        let mut regions = regions;
        regions.sort_by(|a, b| b.size().cmp(&a.size()));

        let mut rooms: Vec<Room> = regions
            .into_iter()
            .enumerate()
            .map(|(id, region)| Room::new(id, region.tiles, map))
            .collect();

        if let Some(main) = rooms.first_mut() {
            main.is_main_room = true;
            main.is_accessible_from_main_room = true;
        }

        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn main_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|room| room.is_main_room)
    }

    pub fn is_connected(&self, a: RoomId, b: RoomId) -> bool {
        self.rooms[a].is_connected(b)
    }

    /// Mark `id` and everything reachable from it as accessible.
    pub fn set_accessible(&mut self, id: RoomId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let room = &mut self.rooms[current];
            if room.is_accessible_from_main_room {
                continue;
            }
            room.is_accessible_from_main_room = true;
            stack.extend(room.connected_rooms.iter().copied());
        }
    }

    /// Link two rooms in both directions and spread accessibility.
    pub fn connect(&mut self, a: RoomId, b: RoomId) {
        if self.rooms[a].is_accessible_from_main_room {
            self.set_accessible(b);
        } else if self.rooms[b].is_accessible_from_main_room {
            self.set_accessible(a);
        }
        self.rooms[a].connected_rooms.insert(b);
        self.rooms[b].connected_rooms.insert(a);
    }

    /// Rooms not yet reachable from the main room.
    pub fn inaccessible_rooms(&self) -> Vec<RoomId> {
        self.rooms
            .iter()
            .filter(|room| !room.is_accessible_from_main_room)
            .map(|room| room.id)
            .collect()
    }

    /// Closest unconnected pair with the first room from `from` and the second
    /// from `to`.
    fn closest_between(&self, from: &[RoomId], to: &[RoomId]) -> Option<Passage> {
        let mut best: Option<Passage> = None;

        for &a in from {
            for &b in to {
                if a == b || self.is_connected(a, b) {
                    continue;
                }
                let room_a = &self.rooms[a];
                let room_b = &self.rooms[b];
                for &tile_a in &room_a.edge_tiles {
                    for &tile_b in &room_b.edge_tiles {
                        let distance_squared = tile_a.distance_squared(tile_b);
                        if best.map_or(true, |p| distance_squared < p.distance_squared) {
                            best = Some(Passage {
                                room_a: a,
                                room_b: b,
                                tile_a,
                                tile_b,
                                distance_squared,
                            });
                        }
                    }
                }
            }
        }

        best
    }

    /// Give every isolated room one link to its nearest neighbour.
    ///
    /// A room is skipped once it has any connection, including one made
    /// earlier in the same phase by another room.
    pub fn connect_isolated_rooms(&mut self) -> Vec<Passage> {
        let all: Vec<RoomId> = (0..self.rooms.len()).collect();
        let mut passages = Vec::new();

        for a in 0..self.rooms.len() {
            if !self.rooms[a].connected_rooms.is_empty() {
                continue;
            }
            if let Some(passage) = self.closest_between(&[a], &all) {
                debug!(
                    "Linking isolated room {} to room {} ({} -> {})",
                    passage.room_a, passage.room_b, passage.tile_a, passage.tile_b
                );
                self.connect(passage.room_a, passage.room_b);
                passages.push(passage);
            }
        }

        passages
    }

    /// Link the closest unreachable/reachable pair until the main room reaches
    /// every room.
    pub fn force_accessibility(&mut self) -> Vec<Passage> {
        let mut passages = Vec::new();

        loop {
            let (accessible, inaccessible): (Vec<RoomId>, Vec<RoomId>) = self
                .rooms
                .iter()
                .map(|room| room.id)
                .partition(|&id| self.rooms[id].is_accessible_from_main_room);

            if accessible.is_empty() || inaccessible.is_empty() {
                break;
            }

            let Some(passage) = self.closest_between(&inaccessible, &accessible) else {
                break;
            };
            debug!(
                "Linking room {} to the main network via room {} ({} -> {})",
                passage.room_a, passage.room_b, passage.tile_a, passage.tile_b
            );
            self.connect(passage.room_a, passage.room_b);
            passages.push(passage);
        }

        passages
    }

    /// Run both connection phases. Returns the passages to carve, in order.
    pub fn connect_closest_rooms(&mut self) -> Vec<Passage> {
        if self.rooms.len() < 2 {
            return Vec::new();
        }
        let mut passages = self.connect_isolated_rooms();
        passages.extend(self.force_accessibility());
        passages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::regions::find_regions;
    use crate::tilemap::map_from_rows;

    fn graph_from_rows(rows: &[&str]) -> (Tilemap<Cell>, RoomGraph) {
        let map = map_from_rows(rows);
        let graph = RoomGraph::from_regions(find_regions(&map, Cell::Floor), &map);
        (map, graph)
    }

    fn assert_symmetric(graph: &RoomGraph) {
        for room in &graph.rooms {
            for &other in &room.connected_rooms {
                assert!(graph.rooms[other].is_connected(room.id));
            }
        }
    }

    #[test]
    #[rustfmt::skip]
    fn test_edge_tiles_use_plus_shape() {
        let map = map_from_rows(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "#####",
        ]);
        let region = &find_regions(&map, Cell::Floor)[0];
        let edges = edge_tiles(&region.tiles, &map);
        assert_eq!(edges.len(), 8);
        assert!(!edges.contains(&Coord::new(2, 2)));
    }

    #[test]
    #[rustfmt::skip]
    fn test_edge_tiles_at_map_edge() {
        let map = map_from_rows(&[
            "...",
            "...",
            "...",
        ]);
        let region = &find_regions(&map, Cell::Floor)[0];
        let edges = edge_tiles(&region.tiles, &map);
        assert_eq!(edges.len(), 8);
    }

    #[test]
    #[rustfmt::skip]
    fn test_largest_room_is_main() {
        let (_, graph) = graph_from_rows(&[
            "########",
            "#.##...#",
            "####...#",
            "########",
        ]);
        assert_eq!(graph.len(), 2);
        let main = graph.main_room().unwrap();
        assert_eq!(main.id, 0);
        assert_eq!(main.size, 6);
        assert!(main.is_accessible_from_main_room);
        assert!(!graph.rooms[1].is_main_room);
        assert!(!graph.rooms[1].is_accessible_from_main_room);
    }

    #[test]
    #[rustfmt::skip]
    fn test_accessibility_spreads_through_components() {
        let (_, mut graph) = graph_from_rows(&[
            "###########",
            "#...#.#.#.#",
            "#...#.#.#.#",
            "###########",
        ]);
        assert_eq!(graph.len(), 4);
        // Chain 1-2-3 away from the main room, then attach 1.
        graph.connect(1, 2);
        graph.connect(2, 3);
        assert!(graph.rooms[1..]
            .iter()
            .all(|r| !r.is_accessible_from_main_room));
        graph.connect(0, 1);
        assert!(graph.rooms.iter().all(|r| r.is_accessible_from_main_room));
        assert_symmetric(&graph);
    }

    #[test]
    #[rustfmt::skip]
    fn test_connect_from_inaccessible_side() {
        let (_, mut graph) = graph_from_rows(&[
            "#######",
            "#..#..#",
            "#..#.##",
            "#######",
        ]);
        graph.connect(1, 0);
        assert!(graph.rooms[1].is_accessible_from_main_room);
        assert!(graph.is_connected(0, 1) && graph.is_connected(1, 0));
    }

    #[test]
    #[rustfmt::skip]
    fn test_all_rooms_become_accessible() {
        let (_, mut graph) = graph_from_rows(&[
            "##############",
            "#....##..##..#",
            "#....##..##..#",
            "##############",
            "#..########..#",
            "#..########..#",
            "##############",
        ]);
        assert_eq!(graph.len(), 5);
        let passages = graph.connect_closest_rooms();
        assert!(!passages.is_empty());
        assert!(graph.inaccessible_rooms().is_empty());
        assert_symmetric(&graph);
    }

    #[test]
    #[rustfmt::skip]
    fn test_isolated_room_links_to_nearest() {
        let (_, mut graph) = graph_from_rows(&[
            "################",
            "#.....#.#######.",
            "#.....#.#######.",
            "################",
        ]);
        // Room 0 is the big one; room 1 the strip at x=7; room 2 the strip at x=15.
        let passages = graph.connect_isolated_rooms();
        assert_eq!(passages[0].room_a, 0);
        assert_eq!(passages[0].room_b, 1);
        assert_eq!(passages[0].distance_squared, 4);
        // Room 1 already has a connection; room 2 picks its closest, room 1.
        assert_eq!(passages.len(), 2);
        assert_eq!((passages[1].room_a, passages[1].room_b), (2, 1));
    }

    #[test]
    #[rustfmt::skip]
    fn test_ties_resolve_to_first_edge_pair() {
        let (_, mut graph) = graph_from_rows(&[
            "###########",
            "##.#...#.##",
            "##.#...#.##",
            "###########",
        ]);
        // Main room in the middle, equal strips on both sides at distance 2.
        assert_eq!(graph.rooms[1].tiles[0], Coord::new(2, 1));
        assert_eq!(graph.rooms[2].tiles[0], Coord::new(8, 1));
        let left = graph.closest_between(&[0], &[1]).unwrap();
        let right = graph.closest_between(&[0], &[2]).unwrap();
        assert_eq!(left.distance_squared, right.distance_squared);

        let passages = graph.connect_isolated_rooms();
        assert_eq!(
            passages[0],
            Passage {
                room_a: 0,
                room_b: 1,
                tile_a: Coord::new(4, 1),
                tile_b: Coord::new(2, 1),
                distance_squared: 4,
            }
        );
    }

    #[test]
    #[rustfmt::skip]
    fn test_forcing_links_closest_unreachable_pair() {
        let (_, mut graph) = graph_from_rows(&[
            "##################",
            "#....#.#######.#.#",
            "#....#.#######.#.#",
            "##################",
        ]);
        assert_eq!(graph.len(), 4);

        // Rooms 2 and 3 pair up with each other, away from the main room.
        let isolated = graph.connect_isolated_rooms();
        let pairs: Vec<(RoomId, RoomId)> = isolated.iter().map(|p| (p.room_a, p.room_b)).collect();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
        assert_eq!(graph.inaccessible_rooms(), vec![2, 3]);

        let forced = graph.force_accessibility();
        assert_eq!(
            forced,
            vec![Passage {
                room_a: 2,
                room_b: 1,
                tile_a: Coord::new(14, 1),
                tile_b: Coord::new(6, 1),
                distance_squared: 64,
            }]
        );
        assert!(graph.inaccessible_rooms().is_empty());
        assert_symmetric(&graph);
    }

    #[test]
    #[rustfmt::skip]
    fn test_single_room_needs_no_connections() {
        let (_, mut graph) = graph_from_rows(&[
            "####",
            "#..#",
            "####",
        ]);
        assert!(graph.connect_closest_rooms().is_empty());
        assert!(graph.rooms[0].is_accessible_from_main_room);
    }

    #[test]
    fn test_no_rooms() {
        let map = Tilemap::new_with(4, 4, Cell::Wall);
        let mut graph = RoomGraph::from_regions(Vec::new(), &map);
        assert!(graph.is_empty());
        assert!(graph.main_room().is_none());
        assert!(graph.connect_closest_rooms().is_empty());
    }

    #[test]
    #[rustfmt::skip]
    fn test_set_accessible_handles_cycles() {
        let (_, mut graph) = graph_from_rows(&[
            "##########",
            "#..#.#.#.#",
            "#..#.#.#.#",
            "##########",
        ]);
        graph.connect(1, 2);
        graph.connect(2, 3);
        graph.connect(3, 1);
        graph.set_accessible(2);
        assert!(graph.rooms.iter().all(|r| r.is_accessible_from_main_room));
    }
}
