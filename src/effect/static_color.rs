//! Static color fill effect
//!
//! Fills all LEDs with a single solid color, with smooth crossfade on color
//! change. The fill is idempotent: once the current color has been emitted
//! and no transition is running, `render` reports the frame as clean so the
//! loop skips redundant pushes to the output driver.

use embassy_time::{Duration, Instant};

use super::Effect;
use crate::{color::Rgb, transition::ValueTransition};

const HELD_FRAME_DURATION: Duration = Duration::from_millis(100);

/// Static color effect - fills all LEDs with one color
#[derive(Debug, Clone)]
pub struct StaticColorEffect {
    /// Color with transition support
    color: ValueTransition<Rgb>,
    /// Current color already pushed to the sink
    pushed: bool,
}

impl StaticColorEffect {
    /// Create a new static color effect
    pub fn new(color: Rgb) -> Self {
        Self {
            color: ValueTransition::new_rgb(color),
            pushed: false,
        }
    }

    /// Set the color with smooth transition
    ///
    /// # Arguments
    /// * `color` - Target color
    /// * `duration` - Transition duration
    pub fn set_color(&mut self, color: Rgb, duration: Duration, now: Instant) {
        self.color.set(color, duration, now);
        self.pushed = false;
    }
}

impl Effect for StaticColorEffect {
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        self.color.tick(now);

        if self.pushed && !self.color.is_transitioning() {
            return false;
        }

        for led in leds {
            *led = self.color.current();
        }

        self.pushed = !self.color.is_transitioning();
        true
    }

    fn reset(&mut self) {
        self.pushed = false;
    }

    fn frame_duration(&self) -> Duration {
        HELD_FRAME_DURATION
    }

    fn is_transitioning(&self) -> bool {
        self.color.is_transitioning()
    }
}
