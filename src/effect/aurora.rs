//! Aurora effect
//!
//! Layered procedural northern lights. Three slowly drifting Gaussian bands
//! (curtains) are composited into intensity, hue and saturation fields with
//! smoothstep and power-curve shaping. Every stochastic parameter undergoes a
//! slow bounded random walk gated per frame by `1 - exp(-rate * dt)`, so the
//! motion stays continuously novel but statistically bounded. A stochastic
//! substorm event boosts intensity and saturation; strong local activity
//! during an event blooms into pink/purple accents. The composited frame is
//! smoothed spatially with a symmetric FIR kernel and temporally with an
//! exponential filter, then gamma-lifted before quantization.

use core::f32::consts::PI;

use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::Effect;
use crate::{
    color::{Rgb, hsv_to_rgb_f},
    mathf::{channel_to_u8, event_gate, gauss, lerp, smoothstep},
    rng::Rng,
};

const FRAME_DURATION: Duration = Duration::from_millis(20);

/// Longest strip the smoothing buffers accommodate
const MAX_PIXELS: usize = 64;

const BAND_COUNT: usize = 3;

/// Maximum dt fed into the walks; longer stalls count as one long frame
const MAX_DT_SECONDS: f32 = 0.25;

// Band parameter bounds (positions normalized to [0, 1] strip space).
// Centers may drift a little past both ends so curtains enter and leave.
const CENTER_MIN: f32 = -0.2;
const CENTER_MAX: f32 = 1.2;
const WIDTH_MIN: f32 = 0.06;
const WIDTH_MAX: f32 = 0.28;
const DRIFT_MIN: f32 = -0.08;
const DRIFT_MAX: f32 = 0.08;
const HUE_BIAS_MIN: f32 = -1.0;
const HUE_BIAS_MAX: f32 = 1.0;

// Global field bounds
const ENERGY_MIN: f32 = 0.35;
const ENERGY_MAX: f32 = 1.0;
const SHEAR_MIN: f32 = -1.0;
const SHEAR_MAX: f32 = 1.0;

// Mean walk rates, events per second
const ENERGY_RETARGET_RATE: f32 = 0.4;
const SHEAR_WALK_RATE: f32 = 0.25;
const DRIFT_WALK_RATE: f32 = 0.3;
const WIDTH_WALK_RATE: f32 = 0.2;
const HUE_WALK_RATE: f32 = 0.15;

/// Energy tracking time constant, seconds
const ENERGY_TAU: f32 = 1.5;

// Substorm events
const SUBSTORM_RATE: f32 = 0.05;
const SUBSTORM_AMP_MIN: f32 = 0.4;
const SUBSTORM_AMP_MAX: f32 = 1.0;
const SUBSTORM_DURATION_MIN: f32 = 3.0;
const SUBSTORM_DURATION_MAX: f32 = 9.0;

/// Base auroral hue (green, on the [0, 1) hue circle)
const HUE_BASE: f32 = 0.36;
/// Bloom accent hue (pink/purple)
const HUE_BLOOM: f32 = 0.87;

/// Temporal smoothing time constant, seconds
const SMOOTHING_TAU: f32 = 0.12;

/// Output gamma lift
const GAMMA_LIFT: f32 = 0.8;

/// Symmetric FIR blur kernel, radius 2
const BLUR_KERNEL: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];

#[derive(Debug, Clone, Copy)]
struct Band {
    center: f32,
    width: f32,
    drift: f32,
    hue_bias: f32,
}

#[derive(Debug, Clone, Copy)]
struct Substorm {
    started: Instant,
    duration: f32,
    amplitude: f32,
}

#[derive(Debug, Clone)]
pub struct AuroraEffect {
    rng: Rng,
    bands: [Band; BAND_COUNT],
    energy: f32,
    energy_target: f32,
    shear: f32,
    substorm: Option<Substorm>,
    /// Temporally smoothed RGB field, one triple per pixel
    smoothed: Vec<[f32; 3], MAX_PIXELS>,
    last_frame: Option<Instant>,
}

impl AuroraEffect {
    pub fn new(seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let bands = core::array::from_fn(|i| {
            #[allow(clippy::cast_precision_loss)]
            let spread = (i as f32 + 0.5) / BAND_COUNT as f32;
            Band {
                center: spread + rng.range_f32(-0.1, 0.1),
                width: rng.range_f32(0.1, 0.2),
                drift: rng.range_f32(DRIFT_MIN, DRIFT_MAX),
                hue_bias: rng.range_f32(-0.4, 0.4),
            }
        });
        let energy = rng.range_f32(0.5, 0.8);
        Self {
            rng,
            bands,
            energy,
            energy_target: energy,
            shear: 0.0,
            substorm: None,
            smoothed: Vec::new(),
            last_frame: None,
        }
    }

    /// Advance all random walks and the substorm lifecycle by `dt` seconds.
    fn step(&mut self, now: Instant, dt: f32) {
        if self.rng.chance(event_gate(ENERGY_RETARGET_RATE, dt)) {
            self.energy_target = self.rng.range_f32(ENERGY_MIN, ENERGY_MAX);
        }
        // Critically damped tracking toward the target energy level
        let track = 1.0 - libm::expf(-dt / ENERGY_TAU);
        self.energy += (self.energy_target - self.energy) * track;
        self.energy = self.energy.clamp(ENERGY_MIN, ENERGY_MAX);

        if self.rng.chance(event_gate(SHEAR_WALK_RATE, dt)) {
            self.shear =
                (self.shear + self.rng.range_f32(-0.3, 0.3)).clamp(SHEAR_MIN, SHEAR_MAX);
        }

        for band in &mut self.bands {
            if self.rng.chance(event_gate(DRIFT_WALK_RATE, dt)) {
                band.drift =
                    (band.drift + self.rng.range_f32(-0.03, 0.03)).clamp(DRIFT_MIN, DRIFT_MAX);
            }
            if self.rng.chance(event_gate(WIDTH_WALK_RATE, dt)) {
                band.width =
                    (band.width + self.rng.range_f32(-0.03, 0.03)).clamp(WIDTH_MIN, WIDTH_MAX);
            }
            if self.rng.chance(event_gate(HUE_WALK_RATE, dt)) {
                band.hue_bias = (band.hue_bias + self.rng.range_f32(-0.2, 0.2))
                    .clamp(HUE_BIAS_MIN, HUE_BIAS_MAX);
            }

            // Curtains reflect at the overshoot margins
            band.center += band.drift * dt;
            if band.center > CENTER_MAX {
                band.center = CENTER_MAX;
                band.drift = -band.drift.abs();
            } else if band.center < CENTER_MIN {
                band.center = CENTER_MIN;
                band.drift = band.drift.abs();
            }
        }

        if let Some(substorm) = self.substorm {
            let elapsed = now.duration_since(substorm.started).as_micros() as f32 / 1_000_000.0;
            if elapsed >= substorm.duration {
                self.substorm = None;
            }
        }
        if self.substorm.is_none() && self.rng.chance(event_gate(SUBSTORM_RATE, dt)) {
            self.substorm = Some(Substorm {
                started: now,
                duration: self
                    .rng
                    .range_f32(SUBSTORM_DURATION_MIN, SUBSTORM_DURATION_MAX),
                amplitude: self.rng.range_f32(SUBSTORM_AMP_MIN, SUBSTORM_AMP_MAX),
            });
        }
    }

    /// Current substorm envelope in [0, 1].
    fn substorm_envelope(&self, now: Instant) -> f32 {
        self.substorm.map_or(0.0, |substorm| {
            let elapsed =
                now.duration_since(substorm.started).as_micros() as f32 / 1_000_000.0;
            let progress = (elapsed / substorm.duration).clamp(0.0, 1.0);
            substorm.amplitude * libm::sinf(PI * progress).max(0.0)
        })
    }

    /// Composite the band fields into one pixel, position `x` in [0, 1].
    fn shade(&self, x: f32, event: f32) -> [f32; 3] {
        // Shear tilts the curtains: positions sample the bands at an offset
        // growing toward the strip ends.
        let tilt = self.shear * (x - 0.5) * 0.15;

        let mut activity = 0.0;
        let mut hue_bias = 0.0;
        for band in &self.bands {
            let w = gauss(x + tilt - band.center, band.width);
            activity += w;
            hue_bias += w * band.hue_bias;
        }
        if activity > 1e-4 {
            hue_bias /= activity;
        }

        let intensity = libm::powf(
            smoothstep(0.05, 0.9, activity * (self.energy + 0.5 * event)),
            1.3,
        );

        // Bloom: strong local activity during a substorm shifts toward pink
        let bloom = smoothstep(0.75, 1.1, activity) * event;

        let hue = lerp(
            HUE_BASE + 0.05 * self.shear * (x - 0.5) * 2.0 + 0.04 * hue_bias,
            HUE_BLOOM,
            bloom * 0.6,
        );
        let saturation = (0.85 + 0.15 * event - 0.25 * bloom).clamp(0.55, 1.0);
        let value =
            (intensity * (0.25 + 0.75 * self.energy) + 0.15 * event * intensity).clamp(0.0, 1.0);

        hsv_to_rgb_f(hue, saturation, value)
    }

    /// Diagnostic used by the simulation harness: all persistent fields are
    /// finite and inside their clamped ranges.
    pub fn state_bounds_ok(&self) -> bool {
        let globals_ok = (ENERGY_MIN..=ENERGY_MAX).contains(&self.energy)
            && (ENERGY_MIN..=ENERGY_MAX).contains(&self.energy_target)
            && (SHEAR_MIN..=SHEAR_MAX).contains(&self.shear);
        let bands_ok = self.bands.iter().all(|band| {
            (CENTER_MIN..=CENTER_MAX).contains(&band.center)
                && (WIDTH_MIN..=WIDTH_MAX).contains(&band.width)
                && (DRIFT_MIN..=DRIFT_MAX).contains(&band.drift)
                && (HUE_BIAS_MIN..=HUE_BIAS_MAX).contains(&band.hue_bias)
        });
        let smoothed_ok = self
            .smoothed
            .iter()
            .all(|px| px.iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)));
        globals_ok && bands_ok && smoothed_ok
    }
}

impl Effect for AuroraEffect {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        if leds.is_empty() {
            return false;
        }
        let len = leds.len().min(MAX_PIXELS);

        let dt = self.last_frame.map_or(0.0, |last| {
            (now.duration_since(last).as_micros() as f32 / 1_000_000.0)
                .clamp(0.0, MAX_DT_SECONDS)
        });
        self.last_frame = Some(now);

        self.step(now, dt);
        let event = self.substorm_envelope(now);

        // Composite the raw field
        let mut raw = [[0.0f32; 3]; MAX_PIXELS];
        let span = (len.max(2) - 1) as f32;
        for (i, px) in raw.iter_mut().take(len).enumerate() {
            *px = self.shade(i as f32 / span, event);
        }

        // Spatial smoothing between pixels
        let mut blurred = [[0.0f32; 3]; MAX_PIXELS];
        for (i, px) in blurred.iter_mut().take(len).enumerate() {
            let mut sum = [0.0f32; 3];
            let mut weight = 0.0;
            for (k, &coefficient) in BLUR_KERNEL.iter().enumerate() {
                let Some(j) = (i + k).checked_sub(BLUR_KERNEL.len() / 2) else {
                    continue;
                };
                if j >= len {
                    continue;
                }
                for (channel, value) in sum.iter_mut().zip(raw[j]) {
                    *channel += coefficient * value;
                }
                weight += coefficient;
            }
            for (channel, value) in px.iter_mut().zip(sum) {
                *channel = value / weight;
            }
        }

        // Temporal smoothing; the buffer resets when the pixel count changes
        if self.smoothed.len() != len {
            self.smoothed.clear();
            for px in blurred.iter().take(len) {
                let _ = self.smoothed.push(*px);
            }
        } else {
            let alpha = if dt > 0.0 {
                1.0 - libm::expf(-dt / SMOOTHING_TAU)
            } else {
                1.0
            };
            for (smoothed, target) in self.smoothed.iter_mut().zip(blurred.iter()) {
                for (channel, &value) in smoothed.iter_mut().zip(target) {
                    *channel = lerp(*channel, value, alpha).clamp(0.0, 1.0);
                }
            }
        }

        // Gamma lift and quantization; pixels past the buffer cap stay black
        for (i, led) in leds.iter_mut().enumerate() {
            *led = if i < len {
                let [r, g, b] = self.smoothed[i];
                Rgb {
                    r: channel_to_u8(libm::powf(r, GAMMA_LIFT)),
                    g: channel_to_u8(libm::powf(g, GAMMA_LIFT)),
                    b: channel_to_u8(libm::powf(b, GAMMA_LIFT)),
                }
            } else {
                Rgb { r: 0, g: 0, b: 0 }
            };
        }

        true
    }

    fn reset(&mut self) {
        self.smoothed.clear();
        self.last_frame = None;
        self.substorm = None;
    }

    fn frame_duration(&self) -> Duration {
        FRAME_DURATION
    }
}
