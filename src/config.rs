//! Cave generation parameters and configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CaveError, Result, MAX_CELLS, MIN_DIMENSION};
use crate::seeds::CaveSeed;

/// Wall density preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CavePreset {
    /// Wide caverns with thin walls
    Open,
    /// The classic look
    #[default]
    Balanced,
    /// Narrow tunnels and many small pockets
    Dense,
}

impl CavePreset {
    pub fn all() -> &'static [Self] {
        &[Self::Open, Self::Balanced, Self::Dense]
    }

    pub fn fill_percent(&self) -> u32 {
        match self {
            Self::Open => 42,
            Self::Balanced => 47,
            Self::Dense => 52,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Open => "Wide caverns with thin walls",
            Self::Balanced => "Mixed caverns and tunnels",
            Self::Dense => "Narrow tunnels, many pockets",
        }
    }
}

impl std::fmt::Display for CavePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Balanced => write!(f, "balanced"),
            Self::Dense => write!(f, "dense"),
        }
    }
}

impl std::str::FromStr for CavePreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "balanced" => Ok(Self::Balanced),
            "dense" => Ok(Self::Dense),
            other => Err(format!("unknown preset '{other}' (expected open, balanced or dense)")),
        }
    }
}

/// All parameters of one cave generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Interior width in tiles (before the border is added)
    pub width: usize,
    /// Interior height in tiles (before the border is added)
    pub height: usize,
    /// Chance (0-100) that an interior cell starts as wall
    pub fill_percent: u32,
    /// Seed text, hashed to the RNG seed
    pub seed: String,
    /// Ignore `seed` and draw a fresh one from the clock on every generation
    pub use_random_seed: bool,
    /// Remove wall regions smaller than `wall_threshold_size`
    pub filter_small_walls: bool,
    /// Remove room regions smaller than `room_threshold_size` (otherwise they stay as rooms)
    pub filter_small_rooms: bool,
    pub wall_threshold_size: usize,
    pub room_threshold_size: usize,
    /// Thickness of the solid wall frame around the finished map
    pub border_size: usize,
    /// Number of cellular-automaton passes
    pub smoothing_passes: usize,
    /// Radius of the disk carved at every point of a passage
    pub passage_radius: i32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            fill_percent: CavePreset::Balanced.fill_percent(),
            seed: "cave".to_string(),
            use_random_seed: false,
            filter_small_walls: true,
            filter_small_rooms: true,
            wall_threshold_size: 50,
            room_threshold_size: 50,
            border_size: 5,
            smoothing_passes: 5,
            passage_radius: 2,
        }
    }
}

impl CaveConfig {
    /// Reject sizes with no interior, maps too large to allocate and
    /// out-of-range fill percentages.
    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(CaveError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let fits = self
            .output_size()
            .and_then(|(width, height)| width.checked_mul(height))
            .is_some_and(|cells| cells <= MAX_CELLS);
        if !fits {
            return Err(CaveError::MapTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.fill_percent > 100 {
            return Err(CaveError::InvalidFillPercent(self.fill_percent));
        }
        Ok(())
    }

    /// Resolve the seed for the next generation.
    pub fn resolve_seed(&self) -> CaveSeed {
        if self.use_random_seed {
            CaveSeed::random()
        } else {
            CaveSeed::from_text(self.seed.clone())
        }
    }

    /// Size of the finished map including the border, or `None` on overflow.
    pub fn output_size(&self) -> Option<(usize, usize)> {
        let frame = self.border_size.checked_mul(2)?;
        Some((
            self.width.checked_add(frame)?,
            self.height.checked_add(frame)?,
        ))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
