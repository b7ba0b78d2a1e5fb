use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Plasma colormap sampled at ten equal intervals.
const PLASMA: [(u8, u8, u8); 11] = [
    (13, 8, 135),
    (65, 4, 157),
    (106, 0, 168),
    (143, 13, 164),
    (177, 42, 144),
    (204, 71, 120),
    (225, 100, 98),
    (242, 132, 75),
    (252, 166, 54),
    (252, 206, 37),
    (240, 249, 33),
];

/// Maps displacement values in `[vmin, vmax]` onto the plasma colormap.
/// Values outside the range are clamped to the end colours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightColorMap {
    pub vmin: f64,
    pub vmax: f64,
}

impl HeightColorMap {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Symmetric range `[-limit, limit]`.
    pub fn symmetric(limit: f64) -> Self {
        Self::new(-limit, limit)
    }

    /// Position of `value` inside the range, clamped to `[0, 1]`.
    pub fn normalized(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if !(span > 0.0) || value.is_nan() {
            return 0.5;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> RGBColor {
        let position = self.normalized(value) * (PLASMA.len() - 1) as f64;
        let lower = (position.floor() as usize).min(PLASMA.len() - 2);
        let fraction = position - lower as f64;

        let (r0, g0, b0) = PLASMA[lower];
        let (r1, g1, b1) = PLASMA[lower + 1];
        RGBColor(
            lerp(r0, r1, fraction),
            lerp(g0, g1, fraction),
            lerp(b0, b1, fraction),
        )
    }
}

fn lerp(from: u8, to: u8, fraction: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * fraction)
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_palette() {
        let map = HeightColorMap::symmetric(1.0);
        assert_eq!(map.color(-1.0), RGBColor(13, 8, 135));
        assert_eq!(map.color(1.0), RGBColor(240, 249, 33));
        assert_eq!(map.color(0.0), RGBColor(204, 71, 120));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let map = HeightColorMap::new(0.0, 2.0);
        assert_eq!(map.color(-5.0), map.color(0.0));
        assert_eq!(map.color(9.0), map.color(2.0));
    }

    #[test]
    fn interpolates_between_samples() {
        let map = HeightColorMap::new(0.0, 10.0);
        // Halfway between the first two samples.
        assert_eq!(map.color(0.5), RGBColor(39, 6, 146));
    }

    #[test]
    fn degenerate_range_maps_to_middle() {
        let map = HeightColorMap::new(1.0, 1.0);
        assert_eq!(map.normalized(1.0), 0.5);
    }
}
