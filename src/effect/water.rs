//! Water caustics effect
//!
//! Per-pixel intensity from a sum of three traveling sine waves at different
//! spatial frequencies and temporal speeds, squared and perturbed with a
//! small uniform noise, then mapped through a deep-blue to cyan gradient.

use core::f32::consts::PI;

use embassy_time::{Duration, Instant};

use super::Effect;
use crate::{
    color::{Rgb, blend_colors},
    mathf::channel_to_u8,
    rng::Rng,
};

const FRAME_DURATION: Duration = Duration::from_millis(20);

const DEEP_BLUE: Rgb = Rgb { r: 0, g: 40, b: 96 };
const BRIGHT_CYAN: Rgb = Rgb {
    r: 64,
    g: 224,
    b: 255,
};

// Spatial frequencies (radians per pixel) and temporal speeds (radians per
// second) of the three traveling waves.
const WAVES: [(f32, f32); 3] = [(0.35, 1.3), (0.13, -0.7), (0.58, 2.1)];

const NOISE_AMPLITUDE: f32 = 0.03;

// Overall brightness floor and ceiling
const INTENSITY_MIN: f32 = 0.12;
const INTENSITY_MAX: f32 = 1.0;

/// Maximum dt fed into the phase accumulators; longer stalls count as one
/// long frame instead of a catch-up burst.
const MAX_DT_SECONDS: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct WaterEffect {
    rng: Rng,
    /// Accumulated temporal phase per wave, wrapped each frame so f32
    /// precision holds on arbitrarily long runs with no phase jumps
    phases: [f32; 3],
    last_frame: Option<Instant>,
}

impl WaterEffect {
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: Rng::new(seed),
            phases: [0.0; 3],
            last_frame: None,
        }
    }
}

impl Effect for WaterEffect {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        let dt = self.last_frame.map_or(0.0, |last| {
            (now.duration_since(last).as_micros() as f32 / 1_000_000.0)
                .clamp(0.0, MAX_DT_SECONDS)
        });
        self.last_frame = Some(now);

        for (phase, (_, speed)) in self.phases.iter_mut().zip(WAVES) {
            *phase = (*phase + speed * dt) % (2.0 * PI);
        }

        for (i, led) in leds.iter_mut().enumerate() {
            let x = i as f32;

            let mut wave = 0.0;
            for ((freq, _), phase) in WAVES.iter().zip(self.phases) {
                wave += libm::sinf(freq * x + phase);
            }

            // Normalize to [0, 1], square for caustic-like contrast
            let normalized = (wave / 3.0 + 1.0) * 0.5;
            let mut intensity = normalized * normalized
                + self.rng.range_f32(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
            intensity = intensity.clamp(0.0, 1.0);
            intensity = INTENSITY_MIN + intensity * (INTENSITY_MAX - INTENSITY_MIN);

            *led = blend_colors(DEEP_BLUE, BRIGHT_CYAN, channel_to_u8(intensity));
        }

        true
    }

    fn reset(&mut self) {
        self.phases = [0.0; 3];
        self.last_frame = None;
    }

    fn frame_duration(&self) -> Duration {
        FRAME_DURATION
    }
}
