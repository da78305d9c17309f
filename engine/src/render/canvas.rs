use std::path::Path;

use glam::DVec2;
use image::{Pixel, Rgba, RgbaImage};

use super::{DrawOptions, Sprite, Surface};
use crate::error::{EngineError, Result};

/// CPU render target. Sprites are inverse-mapped with nearest-neighbour
/// sampling and blended source-over.
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.pixels.save(path).map_err(|source| EngineError::Export {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Screen-space bounding box of the transformed sprite, clipped to the
    /// canvas, as `(x0, y0, x1, y1)` with exclusive upper bounds.
    fn footprint(&self, sprite: &Sprite, options: &DrawOptions) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = sprite.size();
        let (w, h) = (f64::from(w), f64::from(h));
        let corners = [
            DVec2::new(0.0, 0.0),
            DVec2::new(w, 0.0),
            DVec2::new(0.0, h),
            DVec2::new(w, h),
        ]
        .map(|corner| options.transform_point(corner));

        let min = corners.iter().fold(DVec2::splat(f64::INFINITY), |acc, p| acc.min(*p));
        let max = corners
            .iter()
            .fold(DVec2::splat(f64::NEG_INFINITY), |acc, p| acc.max(*p));
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let limit = DVec2::new(
            f64::from(self.pixels.width()),
            f64::from(self.pixels.height()),
        );
        let lo = min.floor().max(DVec2::ZERO);
        let hi = max.ceil().min(limit);
        if lo.x >= hi.x || lo.y >= hi.y {
            return None;
        }
        Some((lo.x as u32, lo.y as u32, hi.x as u32, hi.y as u32))
    }
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn draw_sprite(&mut self, sprite: &Sprite, options: &DrawOptions) {
        if sprite.is_empty() {
            return;
        }
        let Some(inverse) = options.inverse() else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.footprint(sprite, options) else {
            return;
        };

        let (w, h) = sprite.size();
        for y in y0..y1 {
            for x in x0..x1 {
                let center = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let source = inverse.transform_point2(center);
                if source.x < 0.0 || source.y < 0.0 {
                    continue;
                }
                let (sx, sy) = (source.x.floor() as u32, source.y.floor() as u32);
                if sx >= w || sy >= h {
                    continue;
                }
                let Some(texel) = sprite.pixel(sx, sy) else {
                    continue;
                };
                if texel[3] == 0 {
                    continue;
                }
                self.pixels.get_pixel_mut(x, y).blend(&texel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> Sprite {
        Sprite::new(RgbaImage::from_pixel(width, height, color))
    }

    #[test]
    fn identity_draw_copies_pixels() {
        let mut canvas = Canvas::new(8, 8);
        canvas.clear(BLACK);
        canvas.draw_sprite(&solid(2, 3, RED), &DrawOptions::new());

        assert_eq!(*canvas.image().get_pixel(0, 0), RED);
        assert_eq!(*canvas.image().get_pixel(1, 2), RED);
        assert_eq!(*canvas.image().get_pixel(2, 0), BLACK);
        assert_eq!(*canvas.image().get_pixel(0, 3), BLACK);
    }

    #[test]
    fn translated_draw_is_clipped_at_the_edges() {
        let mut canvas = Canvas::new(4, 4);
        canvas.clear(BLACK);
        let mut op = DrawOptions::new();
        op.translate(3.0, -1.0);
        canvas.draw_sprite(&solid(2, 2, RED), &op);

        assert_eq!(*canvas.image().get_pixel(3, 0), RED);
        assert_eq!(*canvas.image().get_pixel(2, 0), BLACK);
        assert_eq!(*canvas.image().get_pixel(3, 1), BLACK);
    }

    #[test]
    fn quarter_turn_swaps_axes() {
        let mut canvas = Canvas::new(8, 8);
        canvas.clear(BLACK);
        let mut op = DrawOptions::new();
        op.rotate(FRAC_PI_2).translate(4.0, 0.0);
        canvas.draw_sprite(&solid(4, 1, RED), &op);

        // A 4x1 bar becomes a 1x4 column just left of x = 4.
        for y in 0..4 {
            assert_eq!(*canvas.image().get_pixel(3, y), RED, "row {y}");
        }
        assert_eq!(*canvas.image().get_pixel(3, 4), BLACK);
        assert_eq!(*canvas.image().get_pixel(4, 0), BLACK);
    }

    #[test]
    fn transparent_texels_leave_the_background() {
        let mut canvas = Canvas::new(2, 1);
        canvas.clear(BLACK);
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(1, 0, RED);
        canvas.draw_sprite(&Sprite::new(image), &DrawOptions::new());

        assert_eq!(*canvas.image().get_pixel(0, 0), BLACK);
        assert_eq!(*canvas.image().get_pixel(1, 0), RED);
    }

    #[test]
    fn collapsed_transforms_draw_nothing() {
        let mut canvas = Canvas::new(4, 4);
        canvas.clear(BLACK);
        let mut op = DrawOptions::new();
        op.scale(0.0, 0.0);
        canvas.draw_sprite(&solid(4, 4, RED), &op);

        assert!(canvas.image().pixels().all(|p| *p == BLACK));
    }
}
