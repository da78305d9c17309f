use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::ship::{Ship, Thruster};

/// Keyboard layout for the four thruster groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Bindings {
    pub clockwise: KeyCode,
    pub counter_clockwise: KeyCode,
    pub forward: KeyCode,
    pub reverse: KeyCode,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            clockwise: KeyCode::KeyD,
            counter_clockwise: KeyCode::KeyA,
            forward: KeyCode::KeyW,
            reverse: KeyCode::KeyS,
        }
    }
}

impl Bindings {
    pub fn thruster(&self, key: KeyCode) -> Option<Thruster> {
        if key == self.clockwise {
            Some(Thruster::Clockwise)
        } else if key == self.counter_clockwise {
            Some(Thruster::CounterClockwise)
        } else if key == self.forward {
            Some(Thruster::Forward)
        } else if key == self.reverse {
            Some(Thruster::Reverse)
        } else {
            None
        }
    }

    /// Forwards a key press or release to the ship. Returns whether the key
    /// is bound.
    pub fn apply(&self, ship: &mut Ship, key: KeyCode, pressed: bool) -> bool {
        let Some(thruster) = self.thruster(key) else {
            return false;
        };
        match thruster {
            Thruster::Clockwise => ship.set_clockwise_thruster(pressed),
            Thruster::CounterClockwise => ship.set_counter_clockwise_thruster(pressed),
            Thruster::Forward => ship.set_forward_thruster(pressed),
            Thruster::Reverse => ship.set_reverse_thruster(pressed),
        }
        true
    }
}
