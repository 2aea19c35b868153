mod kelvin;
mod utils;

pub use kelvin::kelvin_to_rgb;
use smart_leds::RGB8;
pub use utils::{blend_colors, hsv_to_rgb};
pub(crate) use utils::hsv_to_rgb_f;

pub type Rgb = RGB8;
