//! Alert pulse effect
//!
//! All pixels synchronized to a squared-sine red pulse. Green and blue stay
//! at zero.

use embassy_time::{Duration, Instant};

use super::Effect;
use crate::{color::Rgb, mathf::channel_to_u8};

const FRAME_DURATION: Duration = Duration::from_millis(40);
const PULSE_PERIOD_MS: u64 = 1_200;

#[derive(Debug, Clone, Default)]
pub struct AlertEffect {}

impl AlertEffect {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Effect for AlertEffect {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        let phase = (now.as_millis() % PULSE_PERIOD_MS) as f32 / PULSE_PERIOD_MS as f32;
        let s = libm::sinf(core::f32::consts::PI * phase);
        let red = channel_to_u8(s * s);

        for led in leds {
            *led = Rgb { r: red, g: 0, b: 0 };
        }

        true
    }

    fn frame_duration(&self) -> Duration {
        FRAME_DURATION
    }
}
