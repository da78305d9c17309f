//! Frame-stepped 2D engine: an owned registry of polymorphic world objects,
//! a software sprite canvas, a tracking camera and shared sound cues.

pub mod assets;
pub mod audio;
pub mod config;
pub mod context;
pub mod error;
pub mod object;
pub mod render;

pub use config::EngineConfig;
pub use context::{init_logging, EngineContext, Flow};
pub use error::{EngineError, Result};
pub use object::{Frame, Object, ObjectId, World};
