/// Last observed displayed size and pixel density.
///
/// Compared by value each frame; the surface is resized only when it changes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DisplayGeometry {
    /// Displayed width in device-independent units, clamped to the minimum extent.
    pub width: f64,
    /// Displayed height in device-independent units, clamped to the minimum extent.
    pub height: f64,
    pub pixel_density: f64,
}

impl DisplayGeometry {
    /// Builds a geometry from raw surface readings.
    ///
    /// Non-finite or non-positive densities read as 1.
    pub fn observe(client: (f64, f64), pixel_density: f64, min_extent: f64) -> Self {
        let density = if pixel_density.is_finite() && pixel_density > 0.0 {
            pixel_density
        } else {
            1.0
        };
        Self {
            width: client.0.max(min_extent),
            height: client.1.max(min_extent),
            pixel_density: density,
        }
    }

    /// Backing store size in device pixels.
    ///
    /// Rounds so that one displayed unit never maps to a partial trailing pixel:
    /// `floor((extent - 1) * density) + 1`.
    pub fn backing_size(&self) -> (u32, u32) {
        let px = |extent: f64| ((extent - 1.0) * self.pixel_density).floor() as u32 + 1;
        (px(self.width), px(self.height))
    }
}
