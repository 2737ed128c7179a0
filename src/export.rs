//! Cave export: ASCII text, PNG images and JSON
//!
//! Room and passage coordinates are stored relative to the interior map, so
//! every export shifts them by the border size before drawing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use image::{Rgb, RgbImage};
use serde::Serialize;

use crate::cave::{CaveMap, CaveStats};
use crate::cell::Cell;
use crate::error::Result;
use crate::rooms::{Passage, Room, RoomId};
use crate::tilemap::{Coord, Tilemap};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AsciiMode {
    /// Walls and floors only
    #[default]
    Plain,
    /// Passage endpoints and the main room marked
    Annotated,
}

pub fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Wall => '#',
        Cell::Floor => '.',
    }
}

/// Render a map to an ASCII string, one row per line.
pub fn render_ascii(map: &Tilemap<Cell>) -> String {
    let mut result = String::with_capacity((map.width + 1) * map.height);
    for y in 0..map.height {
        for x in 0..map.width {
            result.push(cell_char(*map.get(x, y)));
        }
        result.push('\n');
    }
    result
}

fn shift(coord: Coord, border: usize) -> Coord {
    Coord::new(coord.x + border as i32, coord.y + border as i32)
}

/// Render a cave in the given mode.
///
/// Annotated mode draws main-room tiles as `M` and passage endpoints as `o`.
pub fn render_cave_ascii(cave: &CaveMap, mode: AsciiMode) -> String {
    if mode == AsciiMode::Plain {
        return render_ascii(&cave.map);
    }

    let mut chars = Tilemap::new_with(cave.width(), cave.height(), ' ');
    for (x, y, &cell) in cave.map.iter() {
        chars.set(x, y, cell_char(cell));
    }
    if let Some(main) = cave.rooms.main_room() {
        for &tile in &main.tiles {
            chars.set_coord(shift(tile, cave.border_size), 'M');
        }
    }
    for passage in &cave.passages {
        chars.set_coord(shift(passage.tile_a, cave.border_size), 'o');
        chars.set_coord(shift(passage.tile_b, cave.border_size), 'o');
    }

    let mut result = String::with_capacity((cave.width() + 1) * cave.height());
    for y in 0..chars.height {
        for x in 0..chars.width {
            result.push(*chars.get(x, y));
        }
        result.push('\n');
    }
    result
}

pub fn ascii_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LEGEND ===\n");
    legend.push_str("  # Wall    . Floor\n");
    legend.push_str("  M Main room    o Passage endpoint\n");
    legend
}

/// Write a text report: header, annotated map, legend and room list.
pub fn export_ascii_file(cave: &CaveMap, path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "=== CAVE GENERATOR MAP FILE ===")?;
    writeln!(file, "Seed: {}", cave.seed)?;
    writeln!(file, "Size: {}x{} (border {})", cave.width(), cave.height(), cave.border_size)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_cave_ascii(cave, AsciiMode::Annotated))?;
    writeln!(file)?;
    write!(file, "{}", ascii_legend())?;
    writeln!(file)?;

    writeln!(file, "=== ROOMS ===")?;
    for room in &cave.rooms.rooms {
        let links: Vec<String> = room
            .connected_rooms
            .iter()
            .map(|id| id.to_string())
            .collect();
        writeln!(
            file,
            "  Room {:>3}: {:>5} tiles, {:>4} edge tiles{} -> [{}]",
            room.id,
            room.size,
            room.edge_tiles.len(),
            if room.is_main_room { " (main)" } else { "" },
            links.join(", ")
        )?;
    }
    writeln!(file)?;

    let stats = &cave.stats;
    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "  Wall regions removed: {}", stats.wall_regions_removed)?;
    writeln!(file, "  Small rooms removed:  {}", stats.room_regions_removed)?;
    writeln!(file, "  Rooms:                {}", stats.room_count)?;
    writeln!(file, "  Passages:             {}", stats.passage_count)?;
    let total = (stats.floor_tiles + stats.wall_tiles).max(1);
    writeln!(
        file,
        "  Floor:                {} ({:.1}%)",
        stats.floor_tiles,
        100.0 * stats.floor_tiles as f64 / total as f64
    )?;

    Ok(())
}

const WALL_COLOR: Rgb<u8> = Rgb([40, 36, 34]);
const FLOOR_COLOR: Rgb<u8> = Rgb([196, 184, 160]);
const PASSAGE_COLOR: Rgb<u8> = Rgb([200, 60, 50]);

/// Distinct tint per room, cycling through a small palette. The main room is gold.
pub fn room_color(room: &Room) -> Rgb<u8> {
    const PALETTE: [(u8, u8, u8); 6] = [
        (120, 170, 200),
        (140, 190, 120),
        (190, 140, 190),
        (210, 170, 110),
        (120, 190, 180),
        (180, 160, 140),
    ];
    if room.is_main_room {
        return Rgb([230, 200, 90]);
    }
    let (r, g, b) = PALETTE[room.id % PALETTE.len()];
    Rgb([r, g, b])
}

/// Render the cave to an image with `scale` pixels per tile.
///
/// With `show_rooms` each room is tinted and passage endpoints are marked.
pub fn render_image(cave: &CaveMap, scale: u32, show_rooms: bool) -> RgbImage {
    let scale = scale.max(1);
    let mut colors = Tilemap::new_with(cave.width(), cave.height(), WALL_COLOR);

    for (x, y, &cell) in cave.map.iter() {
        if cell.is_floor() {
            colors.set(x, y, FLOOR_COLOR);
        }
    }

    if show_rooms {
        for room in &cave.rooms.rooms {
            let color = room_color(room);
            for &tile in &room.tiles {
                let tile = shift(tile, cave.border_size);
                if cave.map.get_coord(tile).is_some_and(|c| c.is_floor()) {
                    colors.set_coord(tile, color);
                }
            }
        }
        for passage in &cave.passages {
            colors.set_coord(shift(passage.tile_a, cave.border_size), PASSAGE_COLOR);
            colors.set_coord(shift(passage.tile_b, cave.border_size), PASSAGE_COLOR);
        }
    }

    let mut img = RgbImage::new(cave.width() as u32 * scale, cave.height() as u32 * scale);
    for (x, y, &color) in colors.iter() {
        for py in 0..scale {
            for px in 0..scale {
                img.put_pixel(x as u32 * scale + px, y as u32 * scale + py, color);
            }
        }
    }
    img
}

pub fn export_png(
    cave: &CaveMap,
    scale: u32,
    show_rooms: bool,
    path: impl AsRef<Path>,
) -> Result<()> {
    render_image(cave, scale, show_rooms).save(path)?;
    Ok(())
}

/// Room metadata without the tile lists.
#[derive(Clone, Debug, Serialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub size: usize,
    pub edge_tiles: usize,
    pub is_main_room: bool,
    pub is_accessible_from_main_room: bool,
    pub connected_rooms: Vec<RoomId>,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            size: room.size,
            edge_tiles: room.edge_tiles.len(),
            is_main_room: room.is_main_room,
            is_accessible_from_main_room: room.is_accessible_from_main_room,
            connected_rooms: room.connected_rooms.iter().copied().collect(),
        }
    }
}

/// JSON document for a finished cave.
#[derive(Clone, Debug, Serialize)]
pub struct CaveExport {
    pub seed: String,
    pub seed_value: u64,
    pub width: usize,
    pub height: usize,
    pub border_size: usize,
    /// One string per row, `#` wall and `.` floor
    pub rows: Vec<String>,
    pub rooms: Vec<RoomSummary>,
    pub passages: Vec<Passage>,
    pub stats: CaveStats,
}

impl From<&CaveMap> for CaveExport {
    fn from(cave: &CaveMap) -> Self {
        Self {
            seed: cave.seed.text.clone(),
            seed_value: cave.seed.value,
            width: cave.width(),
            height: cave.height(),
            border_size: cave.border_size,
            rows: render_ascii(&cave.map)
                .lines()
                .map(str::to_string)
                .collect(),
            rooms: cave.rooms.rooms.iter().map(RoomSummary::from).collect(),
            passages: cave.passages.clone(),
            stats: cave.stats.clone(),
        }
    }
}

pub fn to_json(cave: &CaveMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(&CaveExport::from(cave))?)
}

pub fn export_json(cave: &CaveMap, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, to_json(cave)?)?;
    Ok(())
}
