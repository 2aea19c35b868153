//! Simulated incandescent lamp zones
//!
//! Shared machinery for the `eras` and `cinematic` modes. A small number of
//! lamp zones (independent of pixel count) sit along the strip; each carries
//! a jittered color temperature and a brightness level that converges toward
//! a randomly re-targeted value, plus a shared mains-hum oscillation and
//! occasional surge events. Pixels map to the nearest zone with Gaussian
//! falloff; pixels outside every zone's radius stay black.
//!
//! `cinematic` uses the same field with contrastier tuning and adds an
//! oscillating vignette toward the strip edges and single-frame glitch
//! multipliers.

use core::f32::consts::PI;

use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::Effect;
use crate::{
    color::{Rgb, kelvin_to_rgb},
    mathf::{event_gate, gauss},
    rng::Rng,
};

const MAX_LAMPS: usize = 16;

const FRAME_DURATION: Duration = Duration::from_millis(40);

/// Maximum dt fed into the random-walk gates; longer stalls are treated as
/// one long frame instead of a catch-up burst.
const MAX_DT_SECONDS: f32 = 0.25;

/// Surge length bounds, in frames
const SURGE_FRAMES_MIN: u32 = 8;
const SURGE_FRAMES_MAX: u32 = 24;

/// Shared mains-hum angular speed (radians per second)
const HUM_SPEED: f32 = 2.0 * PI * 1.0;

/// Vignette oscillation angular speed
const VIGNETTE_SPEED: f32 = 2.0 * PI / 9.0;

/// Glitch multiplier bounds
const GLITCH_MIN: f32 = 0.3;
const GLITCH_MAX: f32 = 1.6;

/// Tuning constants distinguishing the eras and cinematic renditions.
#[derive(Debug, Clone, Copy)]
struct LampTuning {
    /// Brightness retarget range
    level_min: f32,
    level_max: f32,
    /// Per-frame convergence factor toward the target level
    convergence: f32,
    /// Mean retarget events per second, per lamp
    retarget_rate: f32,
    /// Mean surge events per second, per lamp
    surge_rate: f32,
    surge_amp_min: f32,
    surge_amp_max: f32,
    /// Mains-hum modulation depth
    hum_depth: f32,
    /// Color temperature base and Gaussian jitter, in Kelvin
    kelvin_base: f32,
    kelvin_jitter: f32,
    /// Edge-darkening depth (0 disables the vignette)
    vignette_depth: f32,
    /// Mean single-frame glitches per second (0 disables)
    glitch_rate: f32,
}

const ERAS_TUNING: LampTuning = LampTuning {
    level_min: 0.55,
    level_max: 0.95,
    convergence: 0.19,
    retarget_rate: 0.7,
    surge_rate: 0.25,
    surge_amp_min: 0.08,
    surge_amp_max: 0.25,
    hum_depth: 0.03,
    kelvin_base: 2400.0,
    kelvin_jitter: 180.0,
    vignette_depth: 0.0,
    glitch_rate: 0.0,
};

const CINEMATIC_TUNING: LampTuning = LampTuning {
    level_min: 0.2,
    level_max: 1.0,
    convergence: 0.25,
    retarget_rate: 1.2,
    surge_rate: 0.4,
    surge_amp_min: 0.15,
    surge_amp_max: 0.5,
    hum_depth: 0.05,
    kelvin_base: 3200.0,
    kelvin_jitter: 350.0,
    vignette_depth: 0.35,
    glitch_rate: 0.6,
};

#[derive(Debug, Clone, Copy)]
struct Surge {
    frames_left: u32,
    total_frames: u32,
    amplitude: f32,
}

#[derive(Debug, Clone)]
struct Lamp {
    center: f32,
    radius: f32,
    kelvin: f32,
    color: Rgb,
    level: f32,
    target: f32,
    surge: Option<Surge>,
}

/// Zoned lamp effect shared by `eras` and `cinematic`.
#[derive(Debug, Clone)]
pub struct LampEffect {
    tuning: LampTuning,
    rng: Rng,
    lamps: Vec<Lamp, MAX_LAMPS>,
    lamp_count: usize,
    /// Pixel count the current lamp layout was built for
    layout_len: usize,
    hum_phase: f32,
    vignette_phase: f32,
    /// This frame's glitch multiplier (1.0 = none)
    glitch: f32,
    last_frame: Option<Instant>,
}

impl LampEffect {
    /// Warm, calm incandescent rendition.
    pub fn eras(seed: u64, lamp_count: usize) -> Self {
        Self::with_tuning(seed, lamp_count, ERAS_TUNING)
    }

    /// High-contrast rendition with vignette and glitches.
    pub fn cinematic(seed: u64, lamp_count: usize) -> Self {
        Self::with_tuning(seed, lamp_count, CINEMATIC_TUNING)
    }

    fn with_tuning(seed: u64, lamp_count: usize, tuning: LampTuning) -> Self {
        Self {
            tuning,
            rng: Rng::new(seed),
            lamps: Vec::new(),
            lamp_count: lamp_count.clamp(1, MAX_LAMPS),
            layout_len: 0,
            hum_phase: 0.0,
            vignette_phase: 0.0,
            glitch: 1.0,
            last_frame: None,
        }
    }

    fn jittered_kelvin(&mut self) -> f32 {
        (self.tuning.kelvin_base + self.tuning.kelvin_jitter * self.rng.norm())
            .clamp(1000.0, 6500.0)
    }

    /// Lay the lamps out evenly for a strip of `len` pixels.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn layout(&mut self, len: usize) {
        self.lamps.clear();
        let spacing = len as f32 / self.lamp_count as f32;
        for i in 0..self.lamp_count {
            let kelvin = self.jittered_kelvin();
            let level = self.rng.range_f32(self.tuning.level_min, self.tuning.level_max);
            let lamp = Lamp {
                center: (i as f32 + 0.5) * spacing,
                // Zones do not quite touch; the gaps stay black
                radius: spacing * 0.42,
                kelvin,
                color: kelvin_to_rgb(kelvin as u16),
                level,
                target: level,
                surge: None,
            };
            let _ = self.lamps.push(lamp);
        }
        self.layout_len = len;
    }

    /// Advance lamp levels, hum, surges and glitches by `dt` seconds.
    #[allow(clippy::cast_possible_truncation)]
    fn step(&mut self, dt: f32) {
        self.hum_phase = (self.hum_phase + HUM_SPEED * dt) % (2.0 * PI);
        self.vignette_phase = (self.vignette_phase + VIGNETTE_SPEED * dt) % (2.0 * PI);

        let retarget_p = event_gate(self.tuning.retarget_rate, dt);
        let surge_p = event_gate(self.tuning.surge_rate, dt);

        // Borrow dance: the RNG is needed while iterating the lamps
        let tuning = self.tuning;
        for i in 0..self.lamps.len() {
            if self.rng.chance(retarget_p) {
                let target = self.rng.range_f32(tuning.level_min, tuning.level_max);
                let kelvin = self.jittered_kelvin();
                let lamp = &mut self.lamps[i];
                lamp.target = target;
                lamp.kelvin = kelvin;
                lamp.color = kelvin_to_rgb(kelvin as u16);
            }

            {
                let lamp = &mut self.lamps[i];
                lamp.level += (lamp.target - lamp.level) * tuning.convergence;
                lamp.level = lamp.level.clamp(0.0, 1.0);

                if let Some(mut surge) = lamp.surge {
                    surge.frames_left = surge.frames_left.saturating_sub(1);
                    lamp.surge = (surge.frames_left > 0).then_some(surge);
                }
            }

            if self.lamps[i].surge.is_none() && self.rng.chance(surge_p) {
                let span = SURGE_FRAMES_MAX - SURGE_FRAMES_MIN;
                let total = SURGE_FRAMES_MIN + self.rng.next_u32_below(span + 1);
                let amplitude = self
                    .rng
                    .range_f32(tuning.surge_amp_min, tuning.surge_amp_max);
                self.lamps[i].surge = Some(Surge {
                    frames_left: total,
                    total_frames: total,
                    amplitude,
                });
            }
        }

        self.glitch = if tuning.glitch_rate > 0.0
            && self.rng.chance(event_gate(tuning.glitch_rate, dt))
        {
            self.rng.range_f32(GLITCH_MIN, GLITCH_MAX)
        } else {
            1.0
        };
    }

    /// Instantaneous brightness of a lamp, hum and surge included.
    #[allow(clippy::cast_precision_loss)]
    fn lamp_brightness(&self, lamp: &Lamp) -> f32 {
        let hum = 1.0 + self.tuning.hum_depth * libm::sinf(self.hum_phase);
        let surge = lamp.surge.map_or(0.0, |s| {
            let done = (s.total_frames - s.frames_left) as f32 / s.total_frames as f32;
            s.amplitude * libm::sinf(PI * done).max(0.0)
        });
        (lamp.level * hum + surge).clamp(0.0, 1.0)
    }

    /// Vignette darkening at normalized position `x` in [0, 1].
    fn vignette(&self, x: f32) -> f32 {
        if self.tuning.vignette_depth <= 0.0 {
            return 1.0;
        }
        // Depth itself oscillates slowly
        let depth = self.tuning.vignette_depth * (0.75 + 0.25 * libm::sinf(self.vignette_phase));
        let edge = (x - 0.5).abs() * 2.0;
        1.0 - depth * edge * edge
    }

    /// Diagnostic used by the simulation harness: all persistent fields are
    /// finite and inside their clamped ranges.
    pub fn state_bounds_ok(&self) -> bool {
        let phases_ok = self.hum_phase.is_finite()
            && (0.0..2.0 * PI).contains(&self.hum_phase)
            && self.vignette_phase.is_finite()
            && (0.0..2.0 * PI).contains(&self.vignette_phase);
        let glitch_ok =
            self.glitch == 1.0 || (GLITCH_MIN..=GLITCH_MAX).contains(&self.glitch);
        phases_ok
            && glitch_ok
            && self.lamps.iter().all(|lamp| {
                (0.0..=1.0).contains(&lamp.level)
                    && (0.0..=1.0).contains(&lamp.target)
                    && (1000.0..=6500.0).contains(&lamp.kelvin)
            })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_channel(channel: u8, level: f32) -> u8 {
    (f32::from(channel) * level.clamp(0.0, 1.0) + 0.5) as u8
}

impl Effect for LampEffect {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        if leds.is_empty() {
            return false;
        }

        if self.layout_len != leds.len() {
            self.layout(leds.len());
        }

        let dt = self.last_frame.map_or(0.0, |last| {
            (now.duration_since(last).as_micros() as f32 / 1_000_000.0)
                .clamp(0.0, MAX_DT_SECONDS)
        });
        self.last_frame = Some(now);

        self.step(dt);

        let len = leds.len() as f32;
        for (i, led) in leds.iter_mut().enumerate() {
            let x = i as f32 + 0.5;

            // Nearest zone wins; outside every radius the pixel stays black
            let Some((lamp, distance)) = self
                .lamps
                .iter()
                .map(|lamp| (lamp, (x - lamp.center).abs()))
                .min_by(|a, b| a.1.total_cmp(&b.1))
            else {
                *led = Rgb { r: 0, g: 0, b: 0 };
                continue;
            };

            if distance > lamp.radius {
                *led = Rgb { r: 0, g: 0, b: 0 };
                continue;
            }

            let falloff = gauss(distance, lamp.radius * 0.6);
            let brightness = self.lamp_brightness(lamp)
                * falloff
                * self.vignette(x / len)
                * self.glitch;

            *led = Rgb {
                r: scale_channel(lamp.color.r, brightness),
                g: scale_channel(lamp.color.g, brightness),
                b: scale_channel(lamp.color.b, brightness),
            };
        }

        true
    }

    fn reset(&mut self) {
        self.lamps.clear();
        self.layout_len = 0;
        self.hum_phase = 0.0;
        self.vignette_phase = 0.0;
        self.glitch = 1.0;
        self.last_frame = None;
    }

    fn frame_duration(&self) -> Duration {
        FRAME_DURATION
    }
}
