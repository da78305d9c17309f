use std::fmt;
use std::rc::Rc;

use image::{Rgba, RgbaImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Overlap of two rects; zero-sized when they do not touch.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        Rect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

/// A view into a shared image. Cloning a sprite never copies pixels.
#[derive(Clone)]
pub struct Sprite {
    image: Rc<RgbaImage>,
    region: Rect,
}

impl Sprite {
    pub fn new(image: RgbaImage) -> Self {
        Self::from_shared(Rc::new(image))
    }

    pub fn from_shared(image: Rc<RgbaImage>) -> Self {
        let region = Rect::new(0, 0, image.width(), image.height());
        Self { image, region }
    }

    pub fn width(&self) -> u32 {
        self.region.width
    }

    pub fn height(&self) -> u32 {
        self.region.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.region.width, self.region.height)
    }

    pub fn is_empty(&self) -> bool {
        self.region.width == 0 || self.region.height == 0
    }

    pub fn region(&self) -> Rect {
        self.region
    }

    /// Sub-view in this sprite's own coordinates, clipped to its bounds.
    pub fn sub_sprite(&self, rect: Rect) -> Sprite {
        let absolute = Rect::new(
            self.region.x.saturating_add(rect.x),
            self.region.y.saturating_add(rect.y),
            rect.width,
            rect.height,
        );
        Sprite {
            image: Rc::clone(&self.image),
            region: absolute.intersect(&self.region),
        }
    }

    /// Frame `index` of a horizontal strip of `frame_width` wide cells.
    pub fn frame(&self, index: u32, frame_width: u32) -> Sprite {
        self.sub_sprite(Rect::new(
            index * frame_width,
            0,
            frame_width,
            self.region.height,
        ))
    }

    /// Pixel at sprite-local coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x >= self.region.width || y >= self.region.height {
            return None;
        }
        Some(*self.image.get_pixel(self.region.x + x, self.region.y + y))
    }

    /// True when both sprites view the same underlying image.
    pub fn shares_image(&self, other: &Sprite) -> bool {
        Rc::ptr_eq(&self.image, &other.image)
    }
}

impl fmt::Debug for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sprite")
            .field("image", &(self.image.width(), self.image.height()))
            .field("region", &self.region)
            .finish()
    }
}
