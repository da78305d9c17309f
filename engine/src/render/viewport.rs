use glam::DVec2;
use serde::{Deserialize, Serialize};

/// How the camera reacts to its focus object moving.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Tracking {
    /// Camera never moves on its own.
    Fixed,
    /// Camera is centred on the target every tick.
    #[default]
    Locked,
    /// Camera only moves once the target leaves a box of the given half
    /// extents around the camera position.
    Deadzone { half_width: f64, half_height: f64 },
}

/// Scrollable camera over world space. `position` is the world point shown
/// at the centre of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub position: DVec2,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            position: DVec2::ZERO,
            width,
            height,
        }
    }

    pub fn extent(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn to_screen(&self, world: DVec2) -> DVec2 {
        (world - self.position) + self.extent() / 2.0
    }

    pub fn to_world(&self, screen: DVec2) -> DVec2 {
        screen - self.extent() / 2.0 + self.position
    }

    pub fn center_on(&mut self, target: DVec2) {
        self.position = target;
    }

    pub fn track(&mut self, target: DVec2, tracking: Tracking) {
        match tracking {
            Tracking::Fixed => {}
            Tracking::Locked => self.center_on(target),
            Tracking::Deadzone {
                half_width,
                half_height,
            } => {
                let offset = target - self.position;
                let slack = DVec2::new(half_width.max(0.0), half_height.max(0.0));
                let excess = offset - offset.clamp(-slack, slack);
                self.position += excess;
            }
        }
    }
}
