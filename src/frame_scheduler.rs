//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific
//! timers. The caller is responsible for sleeping/waiting between frames, so
//! the same loop runs under an RTOS task, a thread, or a test harness with
//! synthetic time.

use embassy_time::{Duration, Instant};

use crate::{OutputDriver, Rgb, renderer::Renderer};

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether a frame was pushed to the output driver this tick.
    pub pushed: bool,
}

/// Output driver for simulation: state and timing advance exactly as with
/// hardware attached, the frame push is simply dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDriver;

impl OutputDriver for NullDriver {
    fn write(&mut self, _colors: &[Rgb]) {}
}

/// Perpetual render loop driver.
///
/// Each tick: renders the current frame, pushes it to the output driver when
/// the renderer reports a change, and returns timing info so the caller can
/// sleep for the mode-dependent interval. Drift correction resets the
/// schedule instead of producing catch-up bursts after long stalls.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(renderer, driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const MAX_LEDS: usize> {
    output: O,
    renderer: Renderer<'a, MAX_LEDS>,
    next_frame: Instant,
}

impl<'a, O: OutputDriver, const MAX_LEDS: usize> FrameScheduler<'a, O, MAX_LEDS> {
    /// Create a new frame scheduler.
    pub fn new(renderer: Renderer<'a, MAX_LEDS>, driver: O) -> Self {
        Self {
            output: driver,
            renderer,
            next_frame: Instant::from_millis(0),
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Renders the current frame (which may switch modes)
    /// 2. Writes to the output driver if the frame changed
    /// 3. Applies drift correction if we've fallen too far behind
    /// 4. Returns the deadline for the next frame
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let pushed = match self.renderer.render(now) {
            Some(frame) => {
                self.output.write(frame);
                true
            }
            None => false,
        };

        // Cadence depends on the mode just rendered
        let frame_duration = self.renderer.frame_duration();

        // Drift correction: if we've fallen more than two frames behind,
        // reset to now. This prevents catch-up bursts after long stalls.
        let max_drift = Duration::from_millis(frame_duration.as_millis() * 2);
        if now.as_millis() > self.next_frame.as_millis() + max_drift.as_millis() {
            self.next_frame = now;
        }

        self.next_frame += frame_duration;

        // Calculate sleep duration (may be zero if we're behind)
        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            pushed,
        }
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &Renderer<'a, MAX_LEDS> {
        &self.renderer
    }

    /// Get a mutable reference to the renderer.
    pub fn renderer_mut(&mut self) -> &mut Renderer<'a, MAX_LEDS> {
        &mut self.renderer
    }
}
