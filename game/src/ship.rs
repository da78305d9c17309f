use std::f64::consts::PI;

use glam::DVec2;
use log::{debug, trace};
use rcs_engine::audio::SharedCue;
use rcs_engine::render::{DrawOptions, Sprite, Surface};
use rcs_engine::{Frame, Object};
use serde::{Deserialize, Serialize};

/// Width of one cell in the exhaust animation strips.
pub const EXHAUST_FRAME_WIDTH: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShipTuning {
    /// Cap on `|vx| + |vy|`, in world units per tick.
    pub vmax: f64,
    /// Cap on `|vr|`, in degrees per tick.
    pub rmax: f64,
    /// Linear speed change per tick of forward or reverse thrust.
    pub thrust: f64,
    /// Angular speed change per tick of rotational thrust.
    pub rotational_thrust: f64,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            vmax: 1.0,
            rmax: 10.0,
            thrust: 0.01,
            rotational_thrust: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Thruster {
    Clockwise,
    CounterClockwise,
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thrusters {
    pub clockwise: bool,
    pub counter_clockwise: bool,
    pub forward: bool,
    pub reverse: bool,
}

impl Thrusters {
    pub fn any(&self) -> bool {
        self.clockwise || self.counter_clockwise || self.forward || self.reverse
    }

    fn flag_mut(&mut self, thruster: Thruster) -> &mut bool {
        match thruster {
            Thruster::Clockwise => &mut self.clockwise,
            Thruster::CounterClockwise => &mut self.counter_clockwise,
            Thruster::Forward => &mut self.forward,
            Thruster::Reverse => &mut self.reverse,
        }
    }
}

/// Corner nozzles of the reaction control system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nozzle {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

/// Nozzles to draw, in draw order, for a thruster combination. Forward and
/// reverse skip nozzles that rotation already fires.
pub fn exhaust_plan(thrusters: &Thrusters) -> Vec<Nozzle> {
    let mut plan = Vec::with_capacity(4);
    if thrusters.counter_clockwise {
        plan.extend([Nozzle::FrontLeft, Nozzle::BackRight]);
    }
    if thrusters.clockwise {
        plan.extend([Nozzle::FrontRight, Nozzle::BackLeft]);
    }
    if thrusters.forward {
        if !thrusters.clockwise {
            plan.push(Nozzle::BackLeft);
        }
        if !thrusters.counter_clockwise {
            plan.push(Nozzle::BackRight);
        }
    }
    if thrusters.reverse {
        if !thrusters.counter_clockwise {
            plan.push(Nozzle::FrontLeft);
        }
        if !thrusters.clockwise {
            plan.push(Nozzle::FrontRight);
        }
    }
    plan
}

/// Two-frame animation strips, one per nozzle.
#[derive(Debug, Clone)]
pub struct ExhaustSprites {
    pub front_left: Sprite,
    pub front_right: Sprite,
    pub back_left: Sprite,
    pub back_right: Sprite,
}

impl ExhaustSprites {
    pub fn nozzle(&self, nozzle: Nozzle) -> &Sprite {
        match nozzle {
            Nozzle::FrontLeft => &self.front_left,
            Nozzle::FrontRight => &self.front_right,
            Nozzle::BackLeft => &self.back_left,
            Nozzle::BackRight => &self.back_right,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShipAssets {
    pub hull: Sprite,
    pub exhaust: ExhaustSprites,
}

pub struct Ship {
    hull: Sprite,
    exhaust: ExhaustSprites,
    sound: SharedCue,
    tuning: ShipTuning,

    position: DVec2,
    /// Degrees, kept in `[0, 360)`.
    rotation: f64,
    velocity: DVec2,
    angular_velocity: f64,

    thrusters: Thrusters,
}

impl Ship {
    /// Panics if any sprite is empty: ships must be built from loaded art.
    pub fn new(position: DVec2, assets: &ShipAssets, sound: SharedCue, tuning: ShipTuning) -> Self {
        assert!(!assets.hull.is_empty(), "ship hull sprite is empty");
        for nozzle in [
            Nozzle::FrontLeft,
            Nozzle::FrontRight,
            Nozzle::BackLeft,
            Nozzle::BackRight,
        ] {
            assert!(
                !assets.exhaust.nozzle(nozzle).is_empty(),
                "{nozzle:?} exhaust sprite is empty"
            );
        }

        Self {
            hull: assets.hull.clone(),
            exhaust: assets.exhaust.clone(),
            sound,
            tuning,
            position,
            rotation: 0.0,
            velocity: DVec2::ZERO,
            angular_velocity: 0.0,
            thrusters: Thrusters::default(),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// L1 norm of the velocity, the quantity capped by `vmax`.
    pub fn speed(&self) -> f64 {
        self.velocity.x.abs() + self.velocity.y.abs()
    }

    pub fn thrusters(&self) -> Thrusters {
        self.thrusters
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrusters.any()
    }

    /// Switching a thruster on starts the shared sound; switching off never
    /// stops it, that happens in `update` once every thruster is idle.
    pub fn set_thruster(&mut self, thruster: Thruster, on: bool) {
        let flag = self.thrusters.flag_mut(thruster);
        if *flag == on {
            return;
        }
        *flag = on;
        debug!("{thruster:?} thrusters {}", if on { "on" } else { "off" });
        if on {
            self.sound.borrow_mut().play();
        }
    }

    pub fn set_clockwise_thruster(&mut self, on: bool) {
        self.set_thruster(Thruster::Clockwise, on);
    }

    pub fn set_counter_clockwise_thruster(&mut self, on: bool) {
        self.set_thruster(Thruster::CounterClockwise, on);
    }

    pub fn set_forward_thruster(&mut self, on: bool) {
        self.set_thruster(Thruster::Forward, on);
    }

    pub fn set_reverse_thruster(&mut self, on: bool) {
        self.set_thruster(Thruster::Reverse, on);
    }

    /// Applies a linear thrust of `amount` against the nose direction.
    /// The change is dropped, not clamped, if it would reach `vmax`.
    fn push(&mut self, amount: f64) {
        let heading = (self.rotation + 90.0) * (PI / 180.0);
        let candidate = self.velocity - amount * DVec2::new(heading.cos(), heading.sin());
        if candidate.x.abs() + candidate.y.abs() < self.tuning.vmax {
            self.velocity = candidate;
        }
    }
}

impl Object for Ship {
    fn update(&mut self) {
        self.position += self.velocity;

        let rotation = (self.rotation + self.angular_velocity).rem_euclid(360.0);
        // rem_euclid can round tiny negatives up to exactly 360.
        self.rotation = if rotation >= 360.0 { 0.0 } else { rotation };

        if self.thrusters.forward {
            self.push(self.tuning.thrust);
        }
        if self.thrusters.reverse {
            self.push(-self.tuning.thrust);
        }

        let rmax = self.tuning.rmax;
        if self.thrusters.clockwise && self.angular_velocity < rmax {
            self.angular_velocity = (self.angular_velocity + self.tuning.rotational_thrust).min(rmax);
        }
        if self.thrusters.counter_clockwise && self.angular_velocity > -rmax {
            self.angular_velocity = (self.angular_velocity - self.tuning.rotational_thrust).max(-rmax);
        }

        if !self.is_thrusting() && self.sound.borrow().is_playing() {
            debug!("all thrusters idle, stopping thruster sound");
            self.sound.borrow_mut().stop();
        }

        trace!(
            "ship pos=({:.3}, {:.3}) vel=({:.4}, {:.4}) r={:.2} vr={:.2}",
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.rotation,
            self.angular_velocity
        );
    }

    fn draw(&self, surface: &mut dyn Surface, options: &DrawOptions, frame: &Frame<'_>) {
        let (width, height) = self.hull.size();
        let mut op = DrawOptions::new();
        op.translate(-f64::from(width) / 2.0, -f64::from(height) / 2.0);
        op.rotate(self.rotation.to_radians());

        let screen = frame.viewport.to_screen(self.position);
        op.translate(screen.x, screen.y);
        op.concat(options);

        surface.draw_sprite(&self.hull, &op);

        // The exhaust advances one cell every two ticks.
        let cell = ((frame.count / 2) % 2) as u32;
        for nozzle in exhaust_plan(&self.thrusters) {
            let strip = self.exhaust.nozzle(nozzle);
            surface.draw_sprite(&strip.frame(cell, EXHAUST_FRAME_WIDTH), &op);
        }
    }

    fn position(&self) -> Option<DVec2> {
        Some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_abs_diff_eq;
    use image::{Rgba, RgbaImage};
    use rcs_engine::audio::{SilentCue, SoundCue};
    use rcs_engine::render::{Rect, Viewport};

    use super::*;

    fn strip(shade: u8) -> Sprite {
        Sprite::new(RgbaImage::from_pixel(64, 32, Rgba([shade, shade, 0, 255])))
    }

    fn assets() -> ShipAssets {
        ShipAssets {
            hull: Sprite::new(RgbaImage::from_pixel(32, 32, Rgba([200, 200, 200, 255]))),
            exhaust: ExhaustSprites {
                front_left: strip(10),
                front_right: strip(20),
                back_left: strip(30),
                back_right: strip(40),
            },
        }
    }

    fn ship_with(tuning: ShipTuning) -> (Ship, Rc<RefCell<SilentCue>>, ShipAssets) {
        let cue = Rc::new(RefCell::new(SilentCue::new()));
        let assets = assets();
        let ship = Ship::new(DVec2::ZERO, &assets, cue.clone(), tuning);
        (ship, cue, assets)
    }

    fn ship() -> (Ship, Rc<RefCell<SilentCue>>, ShipAssets) {
        ship_with(ShipTuning::default())
    }

    /// Records which sprites were drawn, with the transform used.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Sprite, DrawOptions)>,
    }

    impl Recorder {
        fn count(&self, sprite: &Sprite) -> usize {
            self.calls
                .iter()
                .filter(|(drawn, _)| drawn.shares_image(sprite))
                .count()
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> (u32, u32) {
            (640, 480)
        }

        fn draw_sprite(&mut self, sprite: &Sprite, options: &DrawOptions) {
            self.calls.push((sprite.clone(), *options));
        }
    }

    fn draw(ship: &Ship, count: u64) -> Recorder {
        let viewport = Viewport::new(640.0, 480.0);
        let mut recorder = Recorder::default();
        ship.draw(
            &mut recorder,
            &DrawOptions::default(),
            &Frame {
                viewport: &viewport,
                count,
            },
        );
        recorder
    }

    #[test]
    fn forward_thrust_accelerates_toward_the_nose() {
        let (mut ship, _, _) = ship();
        ship.set_forward_thruster(true);

        ship.update();
        assert_abs_diff_eq!(ship.velocity().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ship.velocity().y, -0.01, epsilon = 1e-12);
        assert_eq!(ship.position(), DVec2::ZERO);

        ship.update();
        // Position integrates the old velocity before thrust is applied again.
        assert_abs_diff_eq!(ship.position().y, -0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(ship.velocity().y, -0.02, epsilon = 1e-12);
    }

    #[test]
    fn reverse_thrust_accelerates_toward_the_tail() {
        let (mut ship, _, _) = ship();
        ship.set_reverse_thruster(true);
        ship.update();
        assert_abs_diff_eq!(ship.velocity().y, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn linear_speed_never_reaches_vmax() {
        let (mut ship, _, _) = ship_with(ShipTuning {
            vmax: 0.25,
            ..ShipTuning::default()
        });
        ship.set_forward_thruster(true);
        ship.set_clockwise_thruster(true);

        for tick in 0..2_000 {
            if tick == 700 {
                ship.set_forward_thruster(false);
                ship.set_reverse_thruster(true);
            }
            ship.update();
            assert!(ship.speed() < 0.25, "tick {tick}: speed {}", ship.speed());
        }
    }

    #[test]
    fn thrust_past_the_cap_is_rejected_not_clamped() {
        let (mut ship, _, _) = ship_with(ShipTuning {
            vmax: 0.035,
            ..ShipTuning::default()
        });
        ship.set_forward_thruster(true);
        for _ in 0..10 {
            ship.update();
        }
        // 0.01, 0.02, 0.03 accepted; 0.04 rejected every tick after.
        assert_abs_diff_eq!(ship.velocity().y, -0.03, epsilon = 1e-12);
    }

    #[test]
    fn angular_speed_saturates_at_rmax() {
        let (mut ship, _, _) = ship();
        ship.set_clockwise_thruster(true);
        for _ in 0..300 {
            ship.update();
            assert!(ship.angular_velocity() <= 10.0);
        }
        assert_eq!(ship.angular_velocity(), 10.0);

        ship.set_clockwise_thruster(false);
        ship.set_counter_clockwise_thruster(true);
        for _ in 0..600 {
            ship.update();
            assert!(ship.angular_velocity() >= -10.0);
        }
        assert_eq!(ship.angular_velocity(), -10.0);
    }

    #[test]
    fn rotation_stays_in_range_both_ways() {
        let (mut ship, _, _) = ship();
        ship.set_counter_clockwise_thruster(true);
        for _ in 0..500 {
            ship.update();
            assert!((0.0..360.0).contains(&ship.rotation()), "{}", ship.rotation());
        }

        ship.set_counter_clockwise_thruster(false);
        ship.set_clockwise_thruster(true);
        for _ in 0..1_000 {
            ship.update();
            assert!((0.0..360.0).contains(&ship.rotation()), "{}", ship.rotation());
        }
    }

    #[test]
    fn first_counter_clockwise_tick_wraps_below_zero() {
        let (mut ship, _, _) = ship();
        ship.set_counter_clockwise_thruster(true);
        ship.update();
        ship.update();
        assert_abs_diff_eq!(ship.rotation(), 359.95, epsilon = 1e-9);
    }

    #[test]
    fn repeated_on_calls_start_the_sound_once() {
        let (mut ship, cue, _) = ship();
        for _ in 0..5 {
            ship.set_forward_thruster(true);
        }
        assert_eq!(cue.borrow().plays(), 1);

        ship.set_clockwise_thruster(true);
        assert_eq!(cue.borrow().plays(), 2);
    }

    #[test]
    fn turning_a_thruster_off_does_not_stop_the_sound() {
        let (mut ship, cue, _) = ship();
        ship.set_forward_thruster(true);
        ship.set_clockwise_thruster(true);
        ship.set_forward_thruster(false);
        ship.update();
        assert!(cue.borrow().is_playing());
        assert_eq!(cue.borrow().stops(), 0);

        ship.set_clockwise_thruster(false);
        assert!(cue.borrow().is_playing());

        ship.update();
        assert!(!cue.borrow().is_playing());
        assert_eq!(cue.borrow().stops(), 1);

        ship.update();
        assert_eq!(cue.borrow().stops(), 1);
    }

    #[test]
    fn idle_ship_stops_a_sound_started_elsewhere() {
        let (mut ship, cue, _) = ship();
        cue.borrow_mut().play();
        ship.update();
        assert!(!cue.borrow().is_playing());
    }

    #[test]
    fn exhaust_plan_suppresses_doubled_nozzles() {
        let forward_clockwise = Thrusters {
            forward: true,
            clockwise: true,
            ..Thrusters::default()
        };
        assert_eq!(
            exhaust_plan(&forward_clockwise),
            vec![Nozzle::FrontRight, Nozzle::BackLeft, Nozzle::BackRight]
        );

        let reverse_counter = Thrusters {
            reverse: true,
            counter_clockwise: true,
            ..Thrusters::default()
        };
        assert_eq!(
            exhaust_plan(&reverse_counter),
            vec![Nozzle::FrontLeft, Nozzle::BackRight, Nozzle::FrontRight]
        );

        let forward_reverse = Thrusters {
            forward: true,
            reverse: true,
            ..Thrusters::default()
        };
        assert_eq!(
            exhaust_plan(&forward_reverse),
            vec![
                Nozzle::BackLeft,
                Nozzle::BackRight,
                Nozzle::FrontLeft,
                Nozzle::FrontRight
            ]
        );

        assert!(exhaust_plan(&Thrusters::default()).is_empty());
    }

    #[test]
    fn forward_with_clockwise_draws_each_back_nozzle_once() {
        let (mut ship, _, assets) = ship();
        ship.set_forward_thruster(true);
        ship.set_clockwise_thruster(true);

        let recorder = draw(&ship, 0);
        assert_eq!(recorder.count(&assets.hull), 1);
        assert_eq!(recorder.count(&assets.exhaust.back_right), 1);
        assert_eq!(recorder.count(&assets.exhaust.back_left), 1);
        assert_eq!(recorder.count(&assets.exhaust.front_right), 1);
        assert_eq!(recorder.count(&assets.exhaust.front_left), 0);
    }

    #[test]
    fn exhaust_cell_advances_every_two_ticks() {
        let (mut ship, _, _) = ship();
        ship.set_forward_thruster(true);

        let cells: Vec<u32> = (0..6)
            .map(|count| draw(&ship, count).calls[1].0.region().x)
            .collect();
        assert_eq!(cells, vec![0, 0, 32, 32, 0, 0]);
        assert_eq!(draw(&ship, 2).calls[1].0.region(), Rect::new(32, 0, 32, 32));
    }

    #[test]
    fn hull_is_centred_on_the_screen_position() {
        let (mut ship, _, _) = ship();
        ship.set_clockwise_thruster(true);
        for _ in 0..10 {
            ship.update();
        }

        let recorder = draw(&ship, 0);
        let (_, op) = &recorder.calls[0];
        // The sprite centre lands on the viewport centre whatever the rotation.
        let centre = op.transform_point(DVec2::new(16.0, 16.0));
        assert_abs_diff_eq!(centre.x, 320.0, epsilon = 1e-9);
        assert_abs_diff_eq!(centre.y, 240.0, epsilon = 1e-9);

        // The top-left corner swings clockwise around the centre by r.
        let corner = op.transform_point(DVec2::ZERO);
        let r = ship.rotation().to_radians();
        assert_abs_diff_eq!(corner.x, 320.0 - 16.0 * r.cos() + 16.0 * r.sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(corner.y, 240.0 - 16.0 * r.sin() - 16.0 * r.cos(), epsilon = 1e-9);
    }

    #[test]
    #[should_panic(expected = "hull sprite is empty")]
    fn empty_hull_is_rejected() {
        let mut assets = assets();
        assets.hull = Sprite::new(RgbaImage::new(0, 0));
        let cue: SharedCue = Rc::new(RefCell::new(SilentCue::new()));
        let _ = Ship::new(DVec2::ZERO, &assets, cue, ShipTuning::default());
    }
}
