mod assets;
mod config;
mod input;
mod pilot;
mod ship;
mod starfield;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::DVec2;
use log::info;
use rcs_engine::{init_logging, EngineContext, Flow};

use crate::config::{GameConfig, DEFAULT_CONFIG_PATH};
use crate::pilot::Pilot;
use crate::ship::Ship;
use crate::starfield::Starfield;

fn main() -> Result<()> {
    init_logging();

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = GameConfig::load(&path)?;
    info!("config: {} ticks, output {}", config.frames, config.output.display());

    let ship_assets = assets::load_ship_assets(&config.assets)?;
    let thruster_sound = assets::open_thruster_sound(&config.assets)?;

    // ---- Create engine context (game owns this) ----
    let mut ctx = EngineContext::new(config.engine.clone());

    let backdrop = Starfield::new(config.seed, config.stars, ctx.viewport().extent());
    info!("backdrop of {} stars", backdrop.star_count());
    ctx.world_mut().add(backdrop);

    let spawn = DVec2::new(config.spawn[0], config.spawn[1]);
    let ship = Ship::new(spawn, &ship_assets, thruster_sound, config.ship);
    let ship_id = ctx.world_mut().add(ship);
    ctx.set_focus(Some(ship_id));

    let bindings = config.bindings;
    let mut pilot = Pilot::new(config.script.clone());
    if pilot.last_frame().is_some_and(|last| last >= config.frames) {
        log::warn!("script runs past the last of {} ticks", config.frames);
    }
    ctx.run(Some(config.frames), |ctx| {
        let frame = ctx.frame_count();
        let Some(ship) = ctx.world_mut().get_mut::<Ship>(ship_id) else {
            return Flow::Exit;
        };
        for event in pilot.due(frame) {
            if !bindings.apply(ship, event.key, event.pressed) {
                log::warn!("frame {frame}: {:?} is not bound to a thruster", event.key);
            }
        }
        Flow::Continue
    });

    if !pilot.is_finished() {
        info!("stopped with scripted input still pending");
    }
    if let Some(ship) = ctx.world().get::<Ship>(ship_id) {
        let velocity = ship.velocity();
        info!(
            "ship at ({:.2}, {:.2}) heading {:.1} deg, velocity ({:.3}, {:.3}) speed {:.3}, spin {:.2} deg/tick",
            ship.position().x,
            ship.position().y,
            ship.rotation(),
            velocity.x,
            velocity.y,
            ship.speed(),
            ship.angular_velocity()
        );
        info!("thrusters at exit: {:?}", ship.thrusters());
    }

    ctx.canvas()
        .save(&config.output)
        .with_context(|| format!("exporting {}", config.output.display()))?;
    info!("wrote {}", config.output.display());
    Ok(())
}
