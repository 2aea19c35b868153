//! Float helpers shared by the procedural effects.
//!
//! All routines go through `libm` so the crate stays `no_std`.

/// Hermite smoothstep between `edge0` and `edge1`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 >= edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Gaussian falloff of a distance, `sigma` > 0.
pub fn gauss(distance: f32, sigma: f32) -> f32 {
    let s = sigma.max(1e-3);
    libm::expf(-(distance * distance) / (2.0 * s * s))
}

/// Per-frame trigger probability for a Poisson process with mean `rate_hz`
/// events per second, evaluated over an elapsed `dt` seconds.
pub fn event_gate(rate_hz: f32, dt: f32) -> f32 {
    1.0 - libm::expf(-rate_hz * dt.max(0.0))
}

/// Quantize a [0, 1] channel value to u8 with rounding.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
