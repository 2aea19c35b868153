#![no_std]

pub mod bounds;
pub mod color;
pub mod command;
pub mod effect;
pub mod frame_scheduler;
pub mod math8;
pub mod mathf;
pub mod registers;
pub mod renderer;
pub mod rng;
pub mod transition;

pub use bounds::RenderingBounds;
pub use command::{ColorAck, CommandPort, ModeAck};
pub use effect::{EffectSlot, ModeId};
pub use frame_scheduler::{FrameResult, FrameScheduler, NullDriver};
pub use registers::{ControlRegisters, ControlState};
pub use renderer::{LightEngineConfig, Renderer};

pub use color::{Rgb, hsv_to_rgb, kelvin_to_rgb};
pub use rng::Rng;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The engine is generic over this trait; when no hardware is attached,
/// use [`NullDriver`] and the engine runs in simulation with identical
/// state and timing behavior.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
