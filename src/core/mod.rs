// Geometry, motion and protocol logic with no browser dependencies.
pub mod camera;
pub mod config;
pub mod connection;
pub mod constants;
pub mod dispatch;
pub mod engine;
pub mod glyphs;
pub mod input;
pub mod protocol;
pub mod reactor;
pub mod shapes;
pub mod transition;
pub mod voice;

pub use camera::Camera;
pub use config::AppConfig;
pub use connection::ConnectionState;
pub use dispatch::{dispatch, UiEffect, UiEffects};
pub use engine::{FrameParams, ParticleEngine};
pub use protocol::{Command, Inbound, Outbound};
pub use reactor::Effect;
pub use shapes::Mode;

// Shaders bundled as string constants
pub static PARTICLES_WGSL: &str = include_str!("../../shaders/particles.wgsl");
