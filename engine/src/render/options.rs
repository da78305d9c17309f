use glam::{DAffine2, DVec2};

/// Sprite-to-surface transform.
///
/// Each builder call applies *after* the ones before it, so
/// `translate(..).rotate(..)` first moves the sprite and then rotates the
/// result around the surface origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub geom: DAffine2,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            geom: DAffine2::IDENTITY,
        }
    }
}

impl DrawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.geom = DAffine2::from_translation(DVec2::new(tx, ty)) * self.geom;
        self
    }

    /// Rotates clockwise on screen (y grows downward) by `theta` radians.
    pub fn rotate(&mut self, theta: f64) -> &mut Self {
        self.geom = DAffine2::from_angle(theta) * self.geom;
        self
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.geom = DAffine2::from_scale(DVec2::new(sx, sy)) * self.geom;
        self
    }

    /// Appends `other` so it applies after everything already in `self`.
    pub fn concat(&mut self, other: &DrawOptions) -> &mut Self {
        self.geom = other.geom * self.geom;
        self
    }

    pub fn transform_point(&self, point: DVec2) -> DVec2 {
        self.geom.transform_point2(point)
    }

    /// `None` when the transform collapses the sprite to a line or point.
    pub fn inverse(&self) -> Option<DAffine2> {
        let det = self.geom.matrix2.determinant();
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return None;
        }
        Some(self.geom.inverse())
    }
}
