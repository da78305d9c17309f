use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use log::{info, warn};
use rcs_engine::assets;
use rcs_engine::audio::{self, SharedCue, SilentCue};
use rcs_engine::render::Sprite;
use serde::{Deserialize, Serialize};

use crate::ship::{ExhaustSprites, Nozzle, ShipAssets, EXHAUST_FRAME_WIDTH};

/// Size of the hull sprite and of one exhaust cell.
const CELL: u32 = 32;
const EXHAUST_FRAMES: u32 = 2;

/// Optional art and sound files. Anything left unset is replaced by
/// generated placeholders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetPaths {
    pub hull: Option<PathBuf>,
    pub exhaust_front_left: Option<PathBuf>,
    pub exhaust_front_right: Option<PathBuf>,
    pub exhaust_back_left: Option<PathBuf>,
    pub exhaust_back_right: Option<PathBuf>,
    pub thruster_sound: Option<PathBuf>,
}

impl AssetPaths {
    fn exhaust(&self, nozzle: Nozzle) -> Option<&Path> {
        match nozzle {
            Nozzle::FrontLeft => self.exhaust_front_left.as_deref(),
            Nozzle::FrontRight => self.exhaust_front_right.as_deref(),
            Nozzle::BackLeft => self.exhaust_back_left.as_deref(),
            Nozzle::BackRight => self.exhaust_back_right.as_deref(),
        }
    }
}

pub fn load_ship_assets(paths: &AssetPaths) -> Result<ShipAssets> {
    let hull = match &paths.hull {
        Some(path) => assets::load_sprite(path).context("loading hull sprite")?,
        None => {
            warn!("no hull sprite configured, using placeholder art");
            Sprite::new(placeholder_hull())
        }
    };

    let strip = |nozzle: Nozzle| -> Result<Sprite> {
        match paths.exhaust(nozzle) {
            Some(path) => assets::load_strip(path, EXHAUST_FRAMES, EXHAUST_FRAME_WIDTH, CELL)
                .with_context(|| format!("loading {nozzle:?} exhaust strip")),
            None => Ok(Sprite::new(placeholder_exhaust(nozzle))),
        }
    };

    Ok(ShipAssets {
        hull,
        exhaust: ExhaustSprites {
            front_left: strip(Nozzle::FrontLeft)?,
            front_right: strip(Nozzle::FrontRight)?,
            back_left: strip(Nozzle::BackLeft)?,
            back_right: strip(Nozzle::BackRight)?,
        },
    })
}

/// Opens the thruster sound. Falls back to a silent cue when no clip is
/// configured or audio support is compiled out.
pub fn open_thruster_sound(paths: &AssetPaths) -> Result<SharedCue> {
    let Some(path) = &paths.thruster_sound else {
        info!("no thruster sound configured, running silent");
        return Ok(audio::shared(SilentCue::new()));
    };
    let clip = assets::read_bytes(path).context("loading thruster sound")?;
    open_device_cue(clip)
}

#[cfg(feature = "audio")]
fn open_device_cue(clip: Vec<u8>) -> Result<SharedCue> {
    match audio::RodioCue::open(clip) {
        Ok(cue) => Ok(audio::shared(cue)),
        Err(err) => {
            warn!("{err}; running silent");
            Ok(audio::shared(SilentCue::new()))
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_device_cue(clip: Vec<u8>) -> Result<SharedCue> {
    warn!(
        "built without the audio feature, ignoring {} byte thruster clip",
        clip.len()
    );
    Ok(audio::shared(SilentCue::new()))
}

/// Nose-up wedge.
fn placeholder_hull() -> RgbaImage {
    let body = Rgba([180, 190, 205, 255]);
    let window = Rgba([90, 160, 230, 255]);
    let mut image = RgbaImage::new(CELL, CELL);
    let half = CELL as f32 / 2.0;
    for y in 4..CELL - 4 {
        // Width grows linearly from the nose down to the tail.
        let span = (y - 4) as f32 / (CELL - 8) as f32 * (half - 6.0);
        for x in 0..CELL {
            let dx = (x as f32 + 0.5 - half).abs();
            if dx <= span + 1.0 {
                image.put_pixel(x, y, body);
            }
        }
    }
    for y in 12..16 {
        for x in 14..18 {
            image.put_pixel(x, y, window);
        }
    }
    image
}

/// Two-cell strip with a small flame puff in the nozzle's corner. The second
/// cell's puff is one pixel larger.
fn placeholder_exhaust(nozzle: Nozzle) -> RgbaImage {
    let flame = Rgba([255, 170, 60, 220]);
    let core = Rgba([255, 240, 180, 255]);
    let (cx, cy) = match nozzle {
        Nozzle::FrontLeft => (4, 6),
        Nozzle::FrontRight => (CELL - 5, 6),
        Nozzle::BackLeft => (4, CELL - 5),
        Nozzle::BackRight => (CELL - 5, CELL - 5),
    };

    let mut image = RgbaImage::new(CELL * EXHAUST_FRAMES, CELL);
    for frame in 0..EXHAUST_FRAMES {
        let radius = 2 + frame as i64;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let distance = dx * dx + dy * dy;
                if distance > radius * radius {
                    continue;
                }
                let x = (frame * CELL) as i64 + cx as i64 + dx;
                let y = cy as i64 + dy;
                let color = if distance <= 1 { core } else { flame };
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
    image
}
