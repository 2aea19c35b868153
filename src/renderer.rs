use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::bounds::{RenderingBounds, bounded};
use crate::color::Rgb;
use crate::effect::{EffectContext, EffectSlot, ModeId};
use crate::registers::ControlRegisters;

/// Configuration for the light engine
///
/// Pixel count, lamp zone count and the random seed are fixed at process
/// start and never change at runtime.
#[derive(Clone)]
pub struct LightEngineConfig {
    pub bounds: RenderingBounds,
    /// Number of simulated lamp zones for `eras`/`cinematic`
    pub lamp_count: usize,
    /// Seed for the effects' random sources
    pub seed: u64,
    /// Duration of static color crossfades (zero for immediate changes)
    pub color_change: Duration,
}

/// Render loop core - evaluates the active effect once per frame
///
/// Owns the frame buffer, the active effect slot and all per-effect state.
/// The only shared data it touches are the control registers, and only for
/// the one snapshot taken at the start of each frame.
pub struct Renderer<'a, const MAX_LEDS: usize> {
    registers: &'a ControlRegisters,
    bounds: RenderingBounds,
    lamp_count: usize,
    seed: u64,
    color_change: Duration,

    // Internal state
    slot: EffectSlot,
    last_color: Rgb,
    frame_buffer: [Rgb; MAX_LEDS],
}

impl<'a, const MAX_LEDS: usize> Renderer<'a, MAX_LEDS> {
    /// Create a new renderer over the shared control registers.
    ///
    /// The initial mode and color are read from the registers.
    pub fn new(registers: &'a ControlRegisters, config: &LightEngineConfig) -> Self {
        let state = registers.snapshot();
        let ctx = EffectContext {
            color: state.color,
            lamp_count: config.lamp_count,
            seed: config.seed ^ u64::from(state.mode as u8),
        };
        Self {
            registers,
            bounds: config.bounds,
            lamp_count: config.lamp_count,
            seed: config.seed,
            color_change: config.color_change,
            slot: state.mode.to_slot(&ctx),
            last_color: state.color,
            frame_buffer: [Rgb { r: 0, g: 0, b: 0 }; MAX_LEDS],
        }
    }

    /// Process one frame
    ///
    /// Snapshots the control registers, applies any mode/color change, then
    /// dispatches to the active effect. Returns the rendered frame, or
    /// `None` when the effect reports no change worth pushing to the sink.
    pub fn render(&mut self, now: Instant) -> Option<&[Rgb]> {
        let mut state = self.registers.snapshot();

        // A finished self-check restores whatever preceded it
        if self.slot.test_finished(now) {
            if let Some(restored) = self.registers.complete_test() {
                state = restored;
            } else if state.mode == ModeId::Test {
                // Nothing captured (test was the initial mode): settle on a
                // static fill of the configured color
                self.registers.set_mode(ModeId::Static);
                state.mode = ModeId::Static;
            }
        }

        if state.mode != self.slot.id() {
            self.switch_mode(state.mode, state.color);
        } else if state.color != self.last_color {
            self.slot.set_color(state.color, self.color_change, now);
            self.last_color = state.color;
        }

        let frame = bounded(&mut self.frame_buffer, self.bounds);
        let dirty = self.slot.render(now, frame);

        dirty.then(|| {
            &self.frame_buffer[self.bounds.start as usize..self.bounds.end as usize]
        })
    }

    /// Cadence the active effect wants for the next frame
    pub fn frame_duration(&self) -> Duration {
        self.slot.frame_duration()
    }

    /// Mode currently being rendered
    pub fn current_mode(&self) -> ModeId {
        self.slot.id()
    }

    /// Build a fresh effect slot for `mode`
    ///
    /// Per-effect state lives inside the slot, so entering a mode resets its
    /// phases exactly once, at the transition edge.
    fn switch_mode(&mut self, mode: ModeId, color: Rgb) {
        #[cfg(feature = "esp32-log")]
        println!(
            "[Renderer.switch_mode] {} -> {}",
            self.slot.id().as_str(),
            mode.as_str()
        );

        let ctx = EffectContext {
            color,
            lamp_count: self.lamp_count,
            seed: self.seed ^ u64::from(mode as u8),
        };
        self.slot = mode.to_slot(&ctx);
        self.slot.reset();
        self.last_color = color;
    }
}
