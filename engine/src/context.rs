use std::thread;
use std::time::{Duration, Instant};

use image::Rgba;

use crate::config::EngineConfig;
use crate::object::{Frame, ObjectId, World};
use crate::render::{Canvas, DrawOptions, Viewport};

/// Returned by the per-tick hook of [`EngineContext::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns the world and everything needed to step and render it.
pub struct EngineContext {
    /// Wall-clock seconds between the last two ticks of [`EngineContext::run`].
    pub delta_time: f64,
    config: EngineConfig,
    world: World,
    viewport: Viewport,
    canvas: Canvas,
    base: DrawOptions,
    focus: Option<ObjectId>,
    frame_count: u64,
}

/// Allows the setting of the log level through the RUST_LOG env var.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        let scale = if config.scale > 0.0 { config.scale } else { 1.0 };
        let mut base = DrawOptions::new();
        base.scale(scale, scale);
        let viewport = Viewport::new(
            f64::from(config.width) / scale,
            f64::from(config.height) / scale,
        );
        log::info!(
            "engine context {}x{} @ {} Hz, scale {scale}",
            config.width,
            config.height,
            config.tick_rate
        );
        Self {
            delta_time: 0.0,
            canvas: Canvas::new(config.width, config.height),
            config,
            world: World::new(),
            viewport,
            base,
            focus: None,
            frame_count: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Number of completed ticks.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Object the camera follows after each update.
    pub fn set_focus(&mut self, focus: Option<ObjectId>) {
        self.focus = focus;
        if let Some(target) = focus.and_then(|id| self.world.position_of(id)) {
            self.viewport.center_on(target);
        }
    }

    pub fn update(&mut self) {
        self.world.update();
        if let Some(target) = self.focus.and_then(|id| self.world.position_of(id)) {
            self.viewport.track(target, self.config.tracking);
        }
    }

    pub fn draw(&mut self) {
        self.canvas.clear(Rgba(self.config.clear_color));
        let frame = Frame {
            viewport: &self.viewport,
            count: self.frame_count,
        };
        self.world.draw(&mut self.canvas, &self.base, &frame);
    }

    /// One full tick: update every object, move the camera, draw everything.
    pub fn tick(&mut self) {
        self.update();
        self.draw();
        self.frame_count += 1;
    }

    fn tick_interval(&self) -> Option<Duration> {
        match self.config.tick_rate {
            0 => None,
            rate => Some(Duration::from_secs_f64(1.0 / f64::from(rate))),
        }
    }

    /// Runs ticks until `frames` have elapsed (if given) or `before_tick`
    /// returns [`Flow::Exit`]. Returns the number of ticks run.
    pub fn run<F>(&mut self, frames: Option<u64>, mut before_tick: F) -> u64
    where
        F: FnMut(&mut Self) -> Flow,
    {
        let interval = self.tick_interval();
        let mut last = Instant::now();
        let mut ticks = 0;

        loop {
            if frames.is_some_and(|limit| ticks >= limit) {
                break;
            }
            if before_tick(self) == Flow::Exit {
                break;
            }

            self.tick();
            ticks += 1;

            if let Some(interval) = interval {
                let elapsed = last.elapsed();
                if elapsed < interval {
                    thread::sleep(interval - elapsed);
                }
            }
            let now = Instant::now();
            self.delta_time = now.duration_since(last).as_secs_f64();
            last = now;
            log::trace!("tick {} took {:.4}s", self.frame_count, self.delta_time);
        }

        log::info!("loop finished after {ticks} ticks");
        ticks
    }
}
