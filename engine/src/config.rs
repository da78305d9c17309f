use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets;
use crate::error::Result;
use crate::render::Tracking;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Canvas size in pixels.
    pub width: u32,
    pub height: u32,
    /// Ticks per second; `0` runs as fast as possible.
    pub tick_rate: u32,
    /// Uniform scale applied to everything drawn.
    pub scale: f64,
    pub clear_color: [u8; 4],
    pub tracking: Tracking,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            tick_rate: 60,
            scale: 1.0,
            clear_color: [0, 0, 0, 255],
            tracking: Tracking::Locked,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = assets::read_bytes(path)?;
        Self::from_toml_str(&String::from_utf8_lossy(&bytes))
    }
}
