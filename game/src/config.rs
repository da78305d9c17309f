use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rcs_engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::assets::AssetPaths;
use crate::input::Bindings;
use crate::pilot::{self, KeyEvent};
use crate::ship::ShipTuning;

pub const DEFAULT_CONFIG_PATH: &str = "rcs.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub engine: EngineConfig,
    pub ship: ShipTuning,
    /// World position the ship starts at.
    pub spawn: [f64; 2],
    /// Ticks to simulate before exiting.
    pub frames: u64,
    /// Where the last rendered frame is written.
    pub output: PathBuf,
    pub seed: u64,
    pub stars: usize,
    pub assets: AssetPaths,
    pub bindings: Bindings,
    pub script: Vec<KeyEvent>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            ship: ShipTuning::default(),
            spawn: [0.0, 0.0],
            frames: 360,
            output: PathBuf::from("rcs-frame.png"),
            seed: 0x5eed,
            stars: 160,
            assets: AssetPaths::default(),
            bindings: Bindings::default(),
            script: pilot::demo_script(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("parsing game config")
    }

    /// Reads `path`. A missing file is only tolerated at the default path,
    /// where it means "use built-in defaults".
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(source) => {
                Self::from_toml_str(&source).with_context(|| format!("in {}", path.display()))
            }
            Err(err)
                if err.kind() == std::io::ErrorKind::NotFound
                    && path == Path::new(DEFAULT_CONFIG_PATH) =>
            {
                log::info!("{DEFAULT_CONFIG_PATH} not found, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }
}
