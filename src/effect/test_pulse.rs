//! Hardware self-check pulse
//!
//! A fixed-duration full-strip white pulse with a half-sine envelope,
//! floored at zero. The engine watches [`TestPulseEffect::is_finished`] and
//! restores the saved mode/color when the pulse has run its course.

use embassy_time::{Duration, Instant};

use super::Effect;
use crate::{color::Rgb, mathf::channel_to_u8};

/// Total self-check duration
pub const TEST_DURATION: Duration = Duration::from_millis(500);

const FRAME_DURATION: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Default)]
pub struct TestPulseEffect {
    started: Option<Instant>,
}

impl TestPulseEffect {
    pub const fn new() -> Self {
        Self { started: None }
    }

    /// Whether the pulse has run for its full duration.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|started| now.duration_since(started) >= TEST_DURATION)
    }
}

impl Effect for TestPulseEffect {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        let started = *self.started.get_or_insert(now);

        let elapsed_ms = now.duration_since(started).as_millis() as f32;
        let progress = elapsed_ms / TEST_DURATION.as_millis() as f32;

        // Half-sine envelope, floored at 0 once the pulse is over
        let envelope = if progress >= 1.0 {
            0.0
        } else {
            libm::sinf(core::f32::consts::PI * progress).max(0.0)
        };

        let white = channel_to_u8(envelope);
        for led in leds {
            *led = Rgb {
                r: white,
                g: white,
                b: white,
            };
        }

        true
    }

    fn reset(&mut self) {
        self.started = None;
    }

    fn frame_duration(&self) -> Duration {
        FRAME_DURATION
    }
}
