use crate::color::Rgb;
use crate::math8::blend8;
use crate::mathf::channel_to_u8;

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Convert float HSV to RGB channels in [0, 1].
///
/// Hue is a full turn in [0, 1) and is wrapped by modulo, so slowly drifting
/// hue fields never need explicit wrap handling. Saturation and value are
/// clamped to [0, 1]. Standard six-sector formula with the sector selected by
/// `floor(h * 6) mod 6`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn hsv_to_rgb_f(h: f32, s: f32, v: f32) -> [f32; 3] {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let mut h = h - libm::floorf(h);
    if !h.is_finite() {
        h = 0.0;
    }

    let sector = (libm::floorf(h * 6.0) as i32).rem_euclid(6);
    let f = h * 6.0 - libm::floorf(h * 6.0);

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Convert float HSV to an RGB pixel.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let [r, g, b] = hsv_to_rgb_f(h, s, v);
    Rgb {
        r: channel_to_u8(r),
        g: channel_to_u8(g),
        b: channel_to_u8(b),
    }
}
