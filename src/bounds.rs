use crate::Rgb;

/// Bounds of the rendering area
///
/// The pixel count is fixed at configuration time; typical strips carry
/// between 8 and 60 elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderingBounds {
    pub start: u8,
    pub end: u8,
}

impl RenderingBounds {
    /// Bounds covering the first `count` pixels of the strip
    pub const fn strip(count: u8) -> Self {
        Self {
            start: 0,
            end: count,
        }
    }

    /// Get the number of LEDs in the rendering area
    pub const fn count(self) -> u8 {
        self.end - self.start
    }
}

/// Get a slice of the LEDs within the bounds
pub(crate) fn bounded(leds: &mut [Rgb], bounds: RenderingBounds) -> &mut [Rgb] {
    let start = bounds.start;
    let end = bounds.end;
    &mut leds[start as usize..end as usize]
}
