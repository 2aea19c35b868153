//! Cove warm-up effect
//!
//! A one-shot smoothstep ramp from black to a fixed warm target over a fixed
//! number of frames, then a steady hold at a slower cadence. The calibration
//! variant additionally gamma-shapes the ramp. The held frame is never
//! re-pushed; the phase restarts whenever the mode is freshly entered.

use embassy_time::{Duration, Instant};

use super::Effect;
use crate::{color::Rgb, mathf::smoothstep};

/// Number of frames the black-to-warm ramp takes
const RAMP_FRAMES: u32 = 100;

/// Incandescent-like warm target color
const WARM_TARGET: Rgb = Rgb {
    r: 255,
    g: 147,
    b: 41,
};

const RAMP_FRAME_DURATION: Duration = Duration::from_millis(30);
const HOLD_FRAME_DURATION: Duration = Duration::from_millis(200);

const RAMP_GAMMA: f32 = 2.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoveWarmVariant {
    Standard,
    /// Gamma-shaped ramp used during fixture calibration
    GammaShaped,
}

#[derive(Debug, Clone)]
pub struct CoveWarmEffect {
    variant: CoveWarmVariant,
    frame: u32,
}

impl CoveWarmEffect {
    pub const fn new(variant: CoveWarmVariant) -> Self {
        Self { variant, frame: 0 }
    }

    #[allow(clippy::cast_precision_loss)]
    fn level(&self) -> f32 {
        let progress = self.frame.min(RAMP_FRAMES) as f32 / RAMP_FRAMES as f32;
        let level = smoothstep(0.0, 1.0, progress);
        match self.variant {
            CoveWarmVariant::Standard => level,
            CoveWarmVariant::GammaShaped => libm::powf(level, RAMP_GAMMA),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_channel(channel: u8, level: f32) -> u8 {
    (f32::from(channel) * level.clamp(0.0, 1.0) + 0.5) as u8
}

impl Effect for CoveWarmEffect {
    fn render(&mut self, _now: Instant, leds: &mut [Rgb]) -> bool {
        if self.frame > RAMP_FRAMES {
            // Ramp complete, frame already at target
            return false;
        }

        let level = self.level();
        for led in leds {
            *led = Rgb {
                r: scale_channel(WARM_TARGET.r, level),
                g: scale_channel(WARM_TARGET.g, level),
                b: scale_channel(WARM_TARGET.b, level),
            };
        }

        self.frame += 1;
        true
    }

    fn reset(&mut self) {
        self.frame = 0;
    }

    fn frame_duration(&self) -> Duration {
        if self.frame > RAMP_FRAMES {
            HOLD_FRAME_DURATION
        } else {
            RAMP_FRAME_DURATION
        }
    }
}
