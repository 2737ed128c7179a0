use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cave_generator::config::{CaveConfig, CavePreset};
use cave_generator::export::{self, AsciiMode};
use cave_generator::{CaveError, CaveGenerator, CaveMap};

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate procedural cave maps with cellular automata")]
struct Args {
    /// Load parameters from a JSON config file (flags below override it)
    #[arg(short, long)]
    config: Option<String>,

    /// Write the resolved parameters to a JSON config file
    #[arg(long)]
    save_config: Option<String>,

    /// Density preset: open, balanced or dense
    #[arg(short, long)]
    preset: Option<CavePreset>,

    /// Width of the cave interior in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the cave interior in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Chance (0-100) that a cell starts as wall
    #[arg(short, long)]
    fill: Option<u32>,

    /// Seed text (numbers are treated as text)
    #[arg(short, long)]
    seed: Option<String>,

    /// Draw a fresh seed from the clock for every generation
    #[arg(long)]
    random_seed: bool,

    /// Wall regions smaller than this are opened up
    #[arg(long)]
    wall_threshold: Option<usize>,

    /// Floor regions smaller than this are filled in
    #[arg(long)]
    room_threshold: Option<usize>,

    /// Keep small wall regions
    #[arg(long)]
    keep_small_walls: bool,

    /// Keep small floor regions as rooms instead of filling them
    #[arg(long)]
    keep_small_rooms: bool,

    /// Thickness of the wall frame around the map
    #[arg(short, long)]
    border: Option<usize>,

    /// Radius of carved passages
    #[arg(long)]
    passage_radius: Option<i32>,

    /// Number of smoothing passes
    #[arg(long)]
    smoothing_passes: Option<usize>,

    /// Export the map to a PNG image
    #[arg(long)]
    export_png: Option<String>,

    /// Pixels per tile in PNG export
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Export an annotated ASCII report
    #[arg(long)]
    export_ascii: Option<String>,

    /// Export the map and room graph as JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Don't print the map to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Regenerate on Enter until 'q' is entered
    #[arg(short, long)]
    interactive: bool,

    /// List the density presets and exit
    #[arg(long)]
    list_presets: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<CaveConfig, CaveError> {
        let mut config = match &self.config {
            Some(path) => CaveConfig::load(path)?,
            None => CaveConfig::default(),
        };

        if let Some(preset) = self.preset {
            config.fill_percent = preset.fill_percent();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fill) = self.fill {
            config.fill_percent = fill;
        }
        if let Some(ref seed) = self.seed {
            config.seed = seed.clone();
        }
        if self.random_seed {
            config.use_random_seed = true;
        }
        if let Some(threshold) = self.wall_threshold {
            config.wall_threshold_size = threshold;
        }
        if let Some(threshold) = self.room_threshold {
            config.room_threshold_size = threshold;
        }
        if self.keep_small_walls {
            config.filter_small_walls = false;
        }
        if self.keep_small_rooms {
            config.filter_small_rooms = false;
        }
        if let Some(border) = self.border {
            config.border_size = border;
        }
        if let Some(radius) = self.passage_radius {
            config.passage_radius = radius;
        }
        if let Some(passes) = self.smoothing_passes {
            config.smoothing_passes = passes;
        }

        Ok(config)
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn report(cave: &CaveMap, args: &Args) -> Result<(), CaveError> {
    if !args.quiet {
        print!("{}", export::render_cave_ascii(cave, AsciiMode::Plain));
    }
    println!("Seed: {}", cave.seed);
    println!("Map size: {}x{}", cave.width(), cave.height());
    println!(
        "Rooms: {} ({} passages carved, {} small rooms removed, {} wall pockets removed)",
        cave.stats.room_count,
        cave.stats.passage_count,
        cave.stats.room_regions_removed,
        cave.stats.wall_regions_removed
    );

    if let Some(ref path) = args.export_png {
        export::export_png(cave, args.png_scale.clamp(1, 16), true, path)?;
        println!("Exported PNG to: {}", path);
    }
    if let Some(ref path) = args.export_ascii {
        export::export_ascii_file(cave, path)?;
        println!("Exported ASCII map to: {}", path);
    }
    if let Some(ref path) = args.export_json {
        export::export_json(cave, path)?;
        println!("Exported JSON to: {}", path);
    }

    Ok(())
}

fn run(args: &Args) -> Result<(), CaveError> {
    if args.list_presets {
        for preset in CavePreset::all() {
            println!(
                "  {:<10} {:>3}% fill  {}",
                preset.to_string(),
                preset.fill_percent(),
                preset.description()
            );
        }
        return Ok(());
    }

    let config = args.resolve_config()?;

    if let Some(ref path) = args.save_config {
        config.save(path)?;
        println!("Saved config to: {}", path);
    }

    let generator = CaveGenerator::new(config)?;
    let cave = generator.generate()?;
    report(&cave, args)?;

    if !args.interactive {
        return Ok(());
    }

    let stdin = io::stdin();
    loop {
        print!("Press Enter to regenerate, 'q' to quit: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let cave = generator.generate()?;
        report(&cave, args)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
