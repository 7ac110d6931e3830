//! Settings file.
//!
//! JSON, every section optional:
//!
//! ```json
//! {
//!   "scanner": { "subfolder": "relative", "subfolder_custom": "Subs" },
//!   "weights": { "episode": { "release_group": 20 }, "movie": {} }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::scanner::ScannerConfig;
use crate::score::{Scorer, WeightOverrides, Weights};
use crate::Error;

/// Weight overrides per video kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    pub episode: WeightOverrides,
    pub movie: WeightOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub weights: WeightsConfig,
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = text.parse()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Scorer using the default weights with this config's overrides.
    pub fn scorer(&self) -> Scorer {
        Scorer::with_weights(
            Weights::EPISODE.with_overrides(&self.weights.episode),
            Weights::MOVIE.with_overrides(&self.weights.movie),
        )
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }
}
