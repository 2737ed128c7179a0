//! Seed management for cave generation
//!
//! Seeds are entered as text (or numbers) and hashed to the 64-bit value that
//! seeds the generator's ChaCha RNG. The hash is FNV-1a, stable across
//! platforms and toolchains.

use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A generation seed: the text the user typed and the numeric value derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveSeed {
    pub text: String,
    pub value: u64,
}

impl CaveSeed {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = hash_seed(&text);
        Self { text, value }
    }

    /// Numeric seeds go through the same hash as their decimal text, so
    /// `--seed 42` and a config seed of `"42"` produce the same cave.
    pub fn from_number(number: u64) -> Self {
        Self::from_text(number.to_string())
    }

    /// A fresh seed derived from the wall clock.
    pub fn random() -> Self {
        let now = chrono::Utc::now();
        let stamp = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000));
        Self::from_text(stamp.to_string())
    }
}

impl std::fmt::Display for CaveSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({:#018x})", self.text, self.value)
    }
}

/// 64-bit FNV-1a hash of the seed text.
pub fn hash_seed(text: &str) -> u64 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}
