use glam::DVec2;
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rcs_engine::render::{DrawOptions, Sprite, Surface};
use rcs_engine::{Frame, Object};

struct Star {
    /// Position inside one tile, in world units.
    offset: DVec2,
    /// Fraction of camera motion the star follows; smaller is farther away.
    depth: f64,
    twinkle_phase: u64,
}

/// Tiled backdrop of parallax stars. Gives the eye something to judge
/// the ship's drift against.
pub struct Starfield {
    stars: Vec<Star>,
    tile: DVec2,
    bright: Sprite,
    dim: Sprite,
}

impl Starfield {
    pub fn new(seed: u64, count: usize, tile: DVec2) -> Self {
        let tile = tile.max(DVec2::ONE);
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| Star {
                offset: DVec2::new(rng.gen_range(0.0..tile.x), rng.gen_range(0.0..tile.y)),
                depth: rng.gen_range(0.2..1.0),
                twinkle_phase: rng.gen_range(0..64),
            })
            .collect();

        Self {
            stars,
            tile,
            bright: Sprite::new(RgbaImage::from_pixel(1, 1, Rgba([255, 255, 240, 255]))),
            dim: Sprite::new(RgbaImage::from_pixel(1, 1, Rgba([120, 120, 150, 255]))),
        }
    }

    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    /// Screen point of a star, wrapped so the tile repeats across the view.
    fn screen_position(&self, star: &Star, camera: DVec2, extent: DVec2) -> DVec2 {
        let shifted = star.offset - camera * star.depth;
        DVec2::new(
            wrap(shifted.x, self.tile.x.max(extent.x)),
            wrap(shifted.y, self.tile.y.max(extent.y)),
        )
    }
}

fn wrap(value: f64, modulus: f64) -> f64 {
    let wrapped = value.rem_euclid(modulus);
    if wrapped >= modulus {
        0.0
    } else {
        wrapped
    }
}

impl Object for Starfield {
    fn update(&mut self) {}

    fn draw(&self, surface: &mut dyn Surface, options: &DrawOptions, frame: &Frame<'_>) {
        let extent = frame.viewport.extent();
        for star in &self.stars {
            let screen = self.screen_position(star, frame.viewport.position, extent);
            if screen.x >= extent.x || screen.y >= extent.y {
                continue;
            }
            let sprite = if (frame.count + star.twinkle_phase) % 64 < 4 {
                &self.dim
            } else {
                &self.bright
            };
            let mut op = DrawOptions::new();
            op.translate(screen.x.floor(), screen.y.floor()).concat(options);
            surface.draw_sprite(sprite, &op);
        }
    }
}
