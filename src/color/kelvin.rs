use super::Rgb;

/// Convert a Kelvin temperature to an RGB color
///
/// Piecewise empirical fit of black-body radiation color. Supports
/// temperatures between 1000K and 40000K; out-of-range inputs are clamped.
/// Internally works in units of 100K: the red/green fits branch at 66, blue
/// is zero at or below 19.
#[inline]
#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn kelvin_to_rgb(kelvin: u16) -> Rgb {
    let temp = (kelvin as f32 / 100.0).clamp(10.0, 400.0);

    let red = if temp <= 66.0 {
        255.0
    } else {
        (329.698_73 * libm::powf(temp - 60.0, -0.133_204_76)).clamp(0.0, 255.0)
    };

    let green = if temp <= 66.0 {
        99.470_8 * libm::logf(temp) - 161.119_57
    } else {
        288.122_17 * libm::powf(temp - 60.0, -0.075_514_85)
    }
    .clamp(0.0, 255.0);

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        (138.517_73 * libm::logf(temp - 10.0) - 305.044_8).clamp(0.0, 255.0)
    };

    Rgb {
        r: red as u8,
        g: green as u8,
        b: blue as u8,
    }
}
