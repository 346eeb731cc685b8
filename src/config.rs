//! Dial tuning, optionally loaded from a TOML file.
//!
//! Every field has a default, so a file only needs the keys it changes:
//!
//! ```toml
//! early_finalize_probability = 0.5
//! settle_delay_ms = 500
//!
//! [stroke]
//! forward_ms = 400
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{DialError, Result};
use crate::{
    EARLY_FINALIZE_PROBABILITY, MAX_ENTRIES, MIN_EARLY_FINALIZE, SETTLE_DELAY_MS, STOP_HOLD_MS,
    STROKE_FORWARD_MS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Symbols after which the line always connects
    pub max_entries: usize,

    /// Symbols from which an early hang-up may be rolled
    pub min_early_finalize: usize,

    /// Chance per accepted symbol of connecting early
    pub early_finalize_probability: f64,

    /// "Connecting" wait before the answer is computed
    pub settle_delay_ms: u64,

    pub stroke: StrokeTiming,

    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeTiming {
    /// Forward rotation to the finger stop
    pub forward_ms: u64,

    /// Pause at the stop before the spring return
    pub hold_ms: u64,
}

impl Default for StrokeTiming {
    fn default() -> Self {
        Self {
            forward_ms: STROKE_FORWARD_MS,
            hold_ms: STOP_HOLD_MS,
        }
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_ENTRIES,
            min_early_finalize: MIN_EARLY_FINALIZE,
            early_finalize_probability: EARLY_FINALIZE_PROBABILITY,
            settle_delay_ms: SETTLE_DELAY_MS,
            stroke: StrokeTiming::default(),
            seed: None,
        }
    }
}

impl DialConfig {
    /// Read and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DialError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DialConfig = toml::from_str(&raw).map_err(|source| DialError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(DialError::InvalidConfig(
                "max_entries must be at least 1".to_string(),
            ));
        }
        if self.min_early_finalize == 0 || self.min_early_finalize > self.max_entries {
            return Err(DialError::InvalidConfig(format!(
                "min_early_finalize must be within 1..={}, got {}",
                self.max_entries, self.min_early_finalize
            )));
        }
        let p = self.early_finalize_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(DialError::InvalidConfig(format!(
                "early_finalize_probability must be within 0.0..=1.0, got {p}"
            )));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Seeded from `seed` when set, otherwise from entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Copy for the `stream`-th consumer of a shared config.
    ///
    /// A fixed seed is offset per stream so sessions stay reproducible
    /// without all drawing the same numbers.
    pub fn for_stream(&self, stream: u64) -> DialConfig {
        DialConfig {
            seed: self.seed.map(|seed| seed.wrapping_add(stream)),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = DialConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_entries, 5);
        assert_eq!(config.min_early_finalize, 3);
        assert_eq!(config.settle_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DialConfig = toml::from_str(
            "early_finalize_probability = 0.5\n[stroke]\nforward_ms = 400\n",
        )
        .unwrap();
        assert_eq!(config.early_finalize_probability, 0.5);
        assert_eq!(config.stroke.forward_ms, 400);
        assert_eq!(config.stroke.hold_ms, STOP_HOLD_MS);
        assert_eq!(config.max_entries, MAX_ENTRIES);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = DialConfig {
            early_finalize_probability: 1.5,
            ..DialConfig::default()
        };
        assert!(matches!(config.validate(), Err(DialError::InvalidConfig(_))));

        let config = DialConfig {
            early_finalize_probability: f64::NAN,
            ..DialConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_min_above_max() {
        let config = DialConfig {
            max_entries: 2,
            min_early_finalize: 3,
            ..DialConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "midnight_dial_config_{}.toml",
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "settle_delay_ms = 10\nseed = 7").unwrap();
        drop(file);

        let config = DialConfig::load(&path).unwrap();
        assert_eq!(config.settle_delay_ms, 10);
        assert_eq!(config.seed, Some(7));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_streams_get_distinct_seeds() {
        let config = DialConfig {
            seed: Some(u64::MAX),
            ..DialConfig::default()
        };
        assert_eq!(config.for_stream(0).seed, Some(u64::MAX));
        assert_eq!(config.for_stream(1).seed, Some(0));
        assert_ne!(config.for_stream(1).seed, config.for_stream(2).seed);
        assert_eq!(config.for_stream(3), config.for_stream(3));

        let unseeded = DialConfig::default();
        assert_eq!(unseeded.for_stream(5).seed, None);
    }

    #[test]
    fn test_seeded_rng_repeats() {
        use rand::Rng;

        let config = DialConfig {
            seed: Some(42),
            ..DialConfig::default()
        };
        let mut a = config.rng();
        let mut b = config.rng();
        for _ in 0..4 {
            assert_eq!(a.gen::<u32>(), b.gen::<u32>());
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = DialConfig::load("/nonexistent/midnight-dial.toml").unwrap_err();
        assert_eq!(err.code(), "config_error");
    }
}
