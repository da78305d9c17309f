use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

/// A key event due at the start of a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyEvent {
    pub frame: u64,
    pub key: KeyCode,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(frame: u64, key: KeyCode) -> Self {
        Self {
            frame,
            key,
            pressed: true,
        }
    }

    pub fn release(frame: u64, key: KeyCode) -> Self {
        Self {
            frame,
            key,
            pressed: false,
        }
    }
}

/// Replays a recorded key sequence in place of a live keyboard.
#[derive(Debug, Clone, Default)]
pub struct Pilot {
    events: Vec<KeyEvent>,
    next: usize,
}

impl Pilot {
    pub fn new(mut events: Vec<KeyEvent>) -> Self {
        // Stable, so same-frame events keep their written order.
        events.sort_by_key(|event| event.frame);
        Self { events, next: 0 }
    }

    /// Events due at or before `frame` that have not been handed out yet.
    pub fn due(&mut self, frame: u64) -> &[KeyEvent] {
        let start = self.next;
        while self.next < self.events.len() && self.events[self.next].frame <= frame {
            self.next += 1;
        }
        &self.events[start..self.next]
    }

    pub fn is_finished(&self) -> bool {
        self.next == self.events.len()
    }

    /// Frame of the last scripted event, if any.
    pub fn last_frame(&self) -> Option<u64> {
        self.events.last().map(|event| event.frame)
    }
}

/// A short demo: burn forward, turn, counter the spin, brake.
pub fn demo_script() -> Vec<KeyEvent> {
    vec![
        KeyEvent::press(0, KeyCode::KeyW),
        KeyEvent::press(30, KeyCode::KeyD),
        KeyEvent::release(60, KeyCode::KeyW),
        KeyEvent::release(90, KeyCode::KeyD),
        KeyEvent::press(150, KeyCode::KeyA),
        KeyEvent::release(210, KeyCode::KeyA),
        KeyEvent::press(240, KeyCode::KeyS),
        KeyEvent::release(290, KeyCode::KeyS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_handed_out_once_in_frame_order() {
        let mut pilot = Pilot::new(vec![
            KeyEvent::press(5, KeyCode::KeyA),
            KeyEvent::press(0, KeyCode::KeyW),
            KeyEvent::release(5, KeyCode::KeyW),
        ]);

        assert_eq!(pilot.due(0), &[KeyEvent::press(0, KeyCode::KeyW)]);
        assert!(pilot.due(0).is_empty());
        assert!(pilot.due(4).is_empty());
        assert_eq!(
            pilot.due(5),
            &[
                KeyEvent::press(5, KeyCode::KeyA),
                KeyEvent::release(5, KeyCode::KeyW)
            ]
        );
        assert!(pilot.is_finished());
    }

    #[test]
    fn late_polls_catch_up_on_missed_events() {
        let mut pilot = Pilot::new(demo_script());
        assert_eq!(pilot.due(100).len(), 4);
        assert_eq!(pilot.last_frame(), Some(290));
        assert!(!pilot.is_finished());
    }

    #[test]
    fn script_parses_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            script: Vec<KeyEvent>,
        }

        let doc: Doc = toml::from_str(
            r#"
            [[script]]
            frame = 3
            key = "KeyW"
            pressed = true
            "#,
        )
        .unwrap();
        assert_eq!(doc.script, vec![KeyEvent::press(3, KeyCode::KeyW)]);
    }
}
