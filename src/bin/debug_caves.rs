//! Debug tool for comparing fill percentages visually
//! Generates a grid of caves from one seed with different starting densities

use std::process::ExitCode;

use cave_generator::config::CaveConfig;
use cave_generator::export::render_image;
use cave_generator::{CaveGenerator, CaveMap, CaveSeed};
use image::{ImageBuffer, Rgb, RgbImage};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

const WIDTH: usize = 96;
const HEIGHT: usize = 64;
const SEED: &str = "debug";
const SCALE: u32 = 3;
const FILL_PERCENTS: [u32; 6] = [40, 43, 46, 49, 52, 55];
const OUTPUT: &str = "cave_comparison.png";

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    println!("Generating cave comparison grid...");

    // Every variant owns its generator and grid, so they can run side by side.
    let caves: Result<Vec<(u32, CaveMap)>, _> = FILL_PERCENTS
        .par_iter()
        .map(|&fill_percent| {
            let config = CaveConfig {
                width: WIDTH,
                height: HEIGHT,
                fill_percent,
                ..CaveConfig::default()
            };
            let generator = CaveGenerator::new(config)?;
            generator
                .generate_with_seed(CaveSeed::from_text(SEED))
                .map(|cave| (fill_percent, cave))
        })
        .collect();

    let caves = match caves {
        Ok(caves) => caves,
        Err(e) => {
            tracing::error!("Generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let images: Vec<(String, RgbImage)> = caves
        .iter()
        .map(|(fill_percent, cave)| {
            println!(
                "  Fill {}%: {} rooms, {} passages, {} floor tiles",
                fill_percent,
                cave.stats.room_count,
                cave.stats.passage_count,
                cave.stats.floor_tiles
            );
            let label = format!("FILL {} ROOMS {}", fill_percent, cave.stats.room_count);
            (label, render_image(cave, SCALE, true))
        })
        .collect();

    let grid = create_grid(&images, 3, 2);
    if let Err(e) = grid.save(OUTPUT) {
        tracing::error!("Failed to save {}: {}", OUTPUT, e);
        return ExitCode::FAILURE;
    }

    println!("Saved {}", OUTPUT);
    ExitCode::SUCCESS
}

fn create_grid(images: &[(String, RgbImage)], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].1.width();
    let cell_height = images[0].1.height();
    let label_height = 16u32;
    let total_cell_height = cell_height + label_height;

    let mut grid: RgbImage = ImageBuffer::from_pixel(
        cell_width * cols as u32,
        total_cell_height * rows as u32,
        Rgb([30, 30, 30]),
    );

    for (idx, (name, img)) in images.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        if row >= rows {
            break;
        }

        let x_offset = col as u32 * cell_width;
        let y_offset = row as u32 * total_cell_height + label_height;

        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x_offset + x, y_offset + y, *pixel);
        }

        draw_text(&mut grid, x_offset + 4, row as u32 * total_cell_height + 4, name);
    }

    grid
}

// 5x7 bitmaps for the characters used in labels
fn char_bitmap(c: char) -> [u8; 7] {
    match c {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b01110, 0b10001, 0b00001, 0b00110, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110],
        _ => [0; 7],
    }
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str) {
    let white = Rgb([255, 255, 255]);
    let char_width = 6u32;

    for (i, c) in text.chars().enumerate() {
        let cx = x + i as u32 * char_width;
        if cx + 5 >= img.width() {
            break;
        }

        for (row, &bits) in char_bitmap(c).iter().enumerate() {
            for col in 0..5u32 {
                if (bits >> (4 - col)) & 1 == 1 {
                    let py = y + row as u32;
                    if py < img.height() {
                        img.put_pixel(cx + col, py, white);
                    }
                }
            }
        }
    }
}
