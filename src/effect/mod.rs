//! Effect system with compile-time known mode variants
//!
//! All effects are stored in an enum to avoid heap allocations. Each effect
//! owns its persistent state (phases, random-walk targets, event timers) and
//! implements the `Effect` trait. A fresh slot is built whenever the engine
//! enters a mode, so phase resets happen at mode transition edges only.

mod alert;
mod aurora;
mod cove_warm;
mod fire;
mod lamps;
mod static_color;
mod test_pulse;
mod water;

use embassy_time::{Duration, Instant};

pub use alert::AlertEffect;
pub use aurora::AuroraEffect;
pub use cove_warm::{CoveWarmEffect, CoveWarmVariant};
pub use fire::FireEffect;
pub use static_color::StaticColorEffect;
pub use test_pulse::TestPulseEffect;
pub use water::WaterEffect;
pub use lamps::LampEffect;

use crate::color::Rgb;

const MODE_NAME_STATIC: &str = "static";
const MODE_NAME_OFF: &str = "off";
const MODE_NAME_FIRE: &str = "fire";
const MODE_NAME_ERAS: &str = "eras";
const MODE_NAME_CINEMATIC: &str = "cinematic";
const MODE_NAME_ALERT: &str = "alert";
const MODE_NAME_WATER: &str = "water";
const MODE_NAME_COVE_WARM: &str = "cove_warm";
const MODE_NAME_COVE_WARM_TEST: &str = "cove_warm_test";
const MODE_NAME_AURORA: &str = "aurora";
const MODE_NAME_TEST: &str = "test";

const MODE_ID_STATIC: u8 = 0;
const MODE_ID_OFF: u8 = 1;
const MODE_ID_FIRE: u8 = 2;
const MODE_ID_ERAS: u8 = 3;
const MODE_ID_CINEMATIC: u8 = 4;
const MODE_ID_ALERT: u8 = 5;
const MODE_ID_WATER: u8 = 6;
const MODE_ID_COVE_WARM: u8 = 7;
const MODE_ID_COVE_WARM_TEST: u8 = 8;
const MODE_ID_AURORA: u8 = 9;
const MODE_ID_TEST: u8 = 10;

const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Default cadence for effects that do not override it.
pub(crate) const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(50);

/// Inputs an effect needs at construction time.
#[derive(Debug, Clone, Copy)]
pub struct EffectContext {
    /// Current static color from the control registers
    pub color: Rgb,
    /// Number of simulated lamp zones for the zoned effects
    pub lamp_count: usize,
    /// Seed for the effect's private random source
    pub seed: u64,
}

pub trait Effect {
    /// Render a single frame into `leds`.
    ///
    /// Returns whether the frame changed and should be pushed to the output
    /// driver. Effects with change detection (static fills, held ramps)
    /// return `false` for redundant frames.
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool;

    /// Reset effect state
    fn reset(&mut self) {}

    /// Cadence at which the render loop should run this effect
    fn frame_duration(&self) -> Duration {
        DEFAULT_FRAME_DURATION
    }

    /// Check if the effect is transitioning
    fn is_transitioning(&self) -> bool {
        false
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Static single color fill
    Static(StaticColorEffect),
    /// All pixels black
    Off(StaticColorEffect),
    /// Irregular warm combustion flicker
    Fire(FireEffect),
    /// Simulated incandescent lamp zones
    Eras(LampEffect),
    /// High-contrast lamp zones with vignette and glitches
    Cinematic(LampEffect),
    /// Synchronized red pulse
    Alert(AlertEffect),
    /// Traveling-wave caustics in a blue/cyan gradient
    Water(WaterEffect),
    /// One-shot warm-up ramp
    CoveWarm(CoveWarmEffect),
    /// Warm-up ramp, gamma-shaped calibration variant
    CoveWarmTest(CoveWarmEffect),
    /// Layered procedural aurora
    Aurora(AuroraEffect),
    /// Hardware self-check pulse
    Test(TestPulseEffect),
}

/// Known mode ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ModeId {
    Static = MODE_ID_STATIC,
    Off = MODE_ID_OFF,
    Fire = MODE_ID_FIRE,
    Eras = MODE_ID_ERAS,
    Cinematic = MODE_ID_CINEMATIC,
    Alert = MODE_ID_ALERT,
    Water = MODE_ID_WATER,
    CoveWarm = MODE_ID_COVE_WARM,
    CoveWarmTest = MODE_ID_COVE_WARM_TEST,
    Aurora = MODE_ID_AURORA,
    Test = MODE_ID_TEST,
}

impl ModeId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_STATIC => Self::Static,
            MODE_ID_OFF => Self::Off,
            MODE_ID_FIRE => Self::Fire,
            MODE_ID_ERAS => Self::Eras,
            MODE_ID_CINEMATIC => Self::Cinematic,
            MODE_ID_ALERT => Self::Alert,
            MODE_ID_WATER => Self::Water,
            MODE_ID_COVE_WARM => Self::CoveWarm,
            MODE_ID_COVE_WARM_TEST => Self::CoveWarmTest,
            MODE_ID_AURORA => Self::Aurora,
            MODE_ID_TEST => Self::Test,
            _ => return None,
        })
    }

    pub fn to_slot(self, ctx: &EffectContext) -> EffectSlot {
        match self {
            Self::Static => EffectSlot::Static(StaticColorEffect::new(ctx.color)),
            Self::Off => EffectSlot::Off(StaticColorEffect::new(BLACK)),
            Self::Fire => EffectSlot::Fire(FireEffect::new(ctx.seed)),
            Self::Eras => {
                EffectSlot::Eras(LampEffect::eras(ctx.seed, ctx.lamp_count))
            }
            Self::Cinematic => {
                EffectSlot::Cinematic(LampEffect::cinematic(ctx.seed, ctx.lamp_count))
            }
            Self::Alert => EffectSlot::Alert(AlertEffect::new()),
            Self::Water => EffectSlot::Water(WaterEffect::new(ctx.seed)),
            Self::CoveWarm => {
                EffectSlot::CoveWarm(CoveWarmEffect::new(CoveWarmVariant::Standard))
            }
            Self::CoveWarmTest => {
                EffectSlot::CoveWarmTest(CoveWarmEffect::new(CoveWarmVariant::GammaShaped))
            }
            Self::Aurora => EffectSlot::Aurora(AuroraEffect::new(ctx.seed)),
            Self::Test => EffectSlot::Test(TestPulseEffect::new()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => MODE_NAME_STATIC,
            Self::Off => MODE_NAME_OFF,
            Self::Fire => MODE_NAME_FIRE,
            Self::Eras => MODE_NAME_ERAS,
            Self::Cinematic => MODE_NAME_CINEMATIC,
            Self::Alert => MODE_NAME_ALERT,
            Self::Water => MODE_NAME_WATER,
            Self::CoveWarm => MODE_NAME_COVE_WARM,
            Self::CoveWarmTest => MODE_NAME_COVE_WARM_TEST,
            Self::Aurora => MODE_NAME_AURORA,
            Self::Test => MODE_NAME_TEST,
        }
    }

    /// Parse a mode name as received from the service layer.
    ///
    /// Unknown names are rejected here, at the command boundary, instead of
    /// silently falling through at render time.
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_STATIC => Some(Self::Static),
            MODE_NAME_OFF => Some(Self::Off),
            MODE_NAME_FIRE => Some(Self::Fire),
            MODE_NAME_ERAS => Some(Self::Eras),
            MODE_NAME_CINEMATIC => Some(Self::Cinematic),
            MODE_NAME_ALERT => Some(Self::Alert),
            MODE_NAME_WATER => Some(Self::Water),
            MODE_NAME_COVE_WARM => Some(Self::CoveWarm),
            MODE_NAME_COVE_WARM_TEST => Some(Self::CoveWarmTest),
            MODE_NAME_AURORA => Some(Self::Aurora),
            MODE_NAME_TEST => Some(Self::Test),
            _ => None,
        }
    }
}

impl EffectSlot {
    /// Render the current effect
    ///
    /// Returns whether the frame should be pushed to the output driver.
    pub fn render(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        match self {
            Self::Static(effect) | Self::Off(effect) => effect.render(now, leds),
            Self::Fire(effect) => effect.render(now, leds),
            Self::Eras(effect) | Self::Cinematic(effect) => effect.render(now, leds),
            Self::Alert(effect) => effect.render(now, leds),
            Self::Water(effect) => effect.render(now, leds),
            Self::CoveWarm(effect) | Self::CoveWarmTest(effect) => {
                effect.render(now, leds)
            }
            Self::Aurora(effect) => effect.render(now, leds),
            Self::Test(effect) => effect.render(now, leds),
        }
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Static(effect) | Self::Off(effect) => Effect::reset(effect),
            Self::Fire(effect) => Effect::reset(effect),
            Self::Eras(effect) | Self::Cinematic(effect) => Effect::reset(effect),
            Self::Alert(effect) => Effect::reset(effect),
            Self::Water(effect) => Effect::reset(effect),
            Self::CoveWarm(effect) | Self::CoveWarmTest(effect) => Effect::reset(effect),
            Self::Aurora(effect) => Effect::reset(effect),
            Self::Test(effect) => Effect::reset(effect),
        }
    }

    /// Cadence at which the render loop should run the current effect
    pub fn frame_duration(&self) -> Duration {
        match self {
            Self::Static(effect) | Self::Off(effect) => effect.frame_duration(),
            Self::Fire(effect) => effect.frame_duration(),
            Self::Eras(effect) | Self::Cinematic(effect) => effect.frame_duration(),
            Self::Alert(effect) => effect.frame_duration(),
            Self::Water(effect) => effect.frame_duration(),
            Self::CoveWarm(effect) | Self::CoveWarmTest(effect) => {
                effect.frame_duration()
            }
            Self::Aurora(effect) => effect.frame_duration(),
            Self::Test(effect) => effect.frame_duration(),
        }
    }

    /// Get the mode ID for external observation
    pub fn id(&self) -> ModeId {
        match self {
            Self::Static(_) => ModeId::Static,
            Self::Off(_) => ModeId::Off,
            Self::Fire(_) => ModeId::Fire,
            Self::Eras(_) => ModeId::Eras,
            Self::Cinematic(_) => ModeId::Cinematic,
            Self::Alert(_) => ModeId::Alert,
            Self::Water(_) => ModeId::Water,
            Self::CoveWarm(_) => ModeId::CoveWarm,
            Self::CoveWarmTest(_) => ModeId::CoveWarmTest,
            Self::Aurora(_) => ModeId::Aurora,
            Self::Test(_) => ModeId::Test,
        }
    }

    /// Update the color of the current effect with optional transition.
    pub fn set_color(&mut self, color: Rgb, duration: Duration, now: Instant) {
        if let Self::Static(effect) = self {
            effect.set_color(color, duration, now);
        }
    }

    pub fn is_transitioning(&self) -> bool {
        match self {
            Self::Static(effect) => effect.is_transitioning(),
            _ => false,
        }
    }

    /// Whether an active self-check pulse has run its full duration.
    pub fn test_finished(&self, now: Instant) -> bool {
        matches!(self, Self::Test(effect) if effect.is_finished(now))
    }
}
