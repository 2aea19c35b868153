//! Fire flicker effect
//!
//! Each pixel independently dims a fixed warm ember color by a uniform
//! random amount, redrawn at an irregular interval to mimic combustion.

use embassy_time::{Duration, Instant};

use super::Effect;
use crate::{color::Rgb, rng::Rng};

/// Warm base color of the embers
const BASE: Rgb = Rgb { r: 255, g: 96, b: 12 };

/// Maximum per-pixel flicker subtraction
const FLICKER_MAX: u32 = 40;

/// Redraw interval bounds
const INTERVAL_MIN_MS: u32 = 50;
const INTERVAL_MAX_MS: u32 = 150;

#[derive(Debug, Clone)]
pub struct FireEffect {
    rng: Rng,
    interval: Duration,
}

impl FireEffect {
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: Rng::new(seed),
            interval: Duration::from_millis(INTERVAL_MIN_MS as u64),
        }
    }
}

impl Effect for FireEffect {
    fn render(&mut self, _now: Instant, leds: &mut [Rgb]) -> bool {
        for led in leds {
            #[allow(clippy::cast_possible_truncation)]
            let flicker = self.rng.next_u32_below(FLICKER_MAX + 1) as u8;
            *led = Rgb {
                r: BASE.r.saturating_sub(flicker),
                g: BASE.g.saturating_sub(flicker),
                b: BASE.b.saturating_sub(flicker),
            };
        }

        // Irregular redraw cadence, picked fresh every frame
        let span = INTERVAL_MAX_MS - INTERVAL_MIN_MS;
        let ms = INTERVAL_MIN_MS + self.rng.next_u32_below(span + 1);
        self.interval = Duration::from_millis(u64::from(ms));

        true
    }

    fn frame_duration(&self) -> Duration {
        self.interval
    }
}
