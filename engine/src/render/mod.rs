mod canvas;
mod options;
mod sprite;
mod viewport;

pub use canvas::Canvas;
pub use options::DrawOptions;
pub use sprite::{Rect, Sprite};
pub use viewport::{Tracking, Viewport};

/// A render target that sprites can be composited onto.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    fn draw_sprite(&mut self, sprite: &Sprite, options: &DrawOptions);
}
