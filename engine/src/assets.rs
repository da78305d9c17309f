use std::fs;
use std::path::Path;

use image::RgbaImage;

use crate::error::{EngineError, Result};
use crate::render::Sprite;

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| EngineError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image.to_rgba8())
}

pub fn load_sprite(path: &Path) -> Result<Sprite> {
    load_image(path).map(Sprite::new)
}

/// Loads a horizontal animation strip and checks it holds exactly `frames`
/// cells of `frame_width` x `frame_height`.
pub fn load_strip(path: &Path, frames: u32, frame_width: u32, frame_height: u32) -> Result<Sprite> {
    let image = load_image(path)?;
    check_strip(path, &image, frames, frame_width, frame_height)?;
    Ok(Sprite::new(image))
}

pub fn check_strip(
    path: &Path,
    image: &RgbaImage,
    frames: u32,
    frame_width: u32,
    frame_height: u32,
) -> Result<()> {
    let (width, height) = image.dimensions();
    if frames == 0 || width != frames * frame_width || height != frame_height {
        return Err(EngineError::SpriteSheet {
            path: path.to_path_buf(),
            width,
            height,
            frames,
            frame_width,
            frame_height,
        });
    }
    Ok(())
}
