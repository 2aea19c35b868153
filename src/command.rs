//! Command facade
//!
//! The two operations the surrounding service layer calls into the engine
//! with. The facade only writes the control registers; the render loop picks
//! the change up at the start of its next iteration.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Rgb;
use crate::effect::ModeId;
use crate::registers::ControlRegisters;

/// Acknowledgement returned by [`CommandPort::set_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAck {
    /// Whether real hardware is attached (`false` in simulation).
    pub active: bool,
    pub color: Rgb,
}

/// Acknowledgement returned by [`CommandPort::set_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeAck {
    /// Whether real hardware is attached (`false` in simulation).
    pub active: bool,
    pub mode: ModeId,
}

/// Entry point for external command producers.
///
/// Cheap to copy; any number of concurrent callers may share one port. Mode
/// strings are validated before reaching this surface via
/// [`ModeId::parse_from_str`], so malformed requests never enter the engine.
#[derive(Clone, Copy)]
pub struct CommandPort<'a> {
    registers: &'a ControlRegisters,
    hardware_active: bool,
}

impl<'a> CommandPort<'a> {
    /// Create a command port over the shared registers.
    ///
    /// `hardware_active` reports whether a real output driver is attached;
    /// it is echoed back in every acknowledgement.
    pub const fn new(registers: &'a ControlRegisters, hardware_active: bool) -> Self {
        Self {
            registers,
            hardware_active,
        }
    }

    /// Set the static color. Switches the engine to [`ModeId::Static`].
    pub fn set_color(&self, color: Rgb) -> ColorAck {
        #[cfg(feature = "esp32-log")]
        println!("[CommandPort.set_color] {:?}", color);
        self.registers.set_color(color);
        ColorAck {
            active: self.hardware_active,
            color,
        }
    }

    /// Switch the engine to a different mode.
    pub fn set_mode(&self, mode: ModeId) -> ModeAck {
        #[cfg(feature = "esp32-log")]
        println!("[CommandPort.set_mode] {}", mode.as_str());
        self.registers.set_mode(mode);
        ModeAck {
            active: self.hardware_active,
            mode,
        }
    }
}
