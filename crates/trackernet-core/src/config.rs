use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

fn default_step_time_secs() -> f64 {
    1.0
}

fn default_staleness_secs() -> f64 {
    180.0
}

fn default_feed_url() -> String {
    "http://api.trackernet.org/trains.csv".to_string()
}

fn default_stations_file() -> PathBuf {
    PathBuf::from("data/station-codes.csv")
}

fn default_network_file() -> PathBuf {
    PathBuf::from("data/tube-network.json")
}

fn default_seed() -> u64 {
    0
}

/// Runtime configuration, loaded from YAML with per-field defaults so a
/// partial file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackernetConfig {
    /// Simulation step interval in seconds.
    #[serde(default = "default_step_time_secs")]
    pub step_time_secs: f64,
    /// Age after which held feed data triggers a refetch.
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: f64,
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_stations_file")]
    pub stations_file: PathBuf,
    #[serde(default = "default_network_file")]
    pub network_file: PathBuf,
    /// Seed for the route-choice generator. Fixed seed, reproducible run.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for TrackernetConfig {
    fn default() -> Self {
        Self {
            step_time_secs: default_step_time_secs(),
            staleness_secs: default_staleness_secs(),
            feed_url: default_feed_url(),
            stations_file: default_stations_file(),
            network_file: default_network_file(),
            seed: default_seed(),
        }
    }
}

impl TrackernetConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                info!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}
