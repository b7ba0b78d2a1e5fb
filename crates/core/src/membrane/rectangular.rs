use std::f64::consts::PI;

use super::{ensure_finite, ensure_positive, Geometry, Membrane, WaveNumbers};
use crate::Result;

/// Rectangular membrane clamped on all four edges.
///
/// The spatial eigenfunction is `sin(nπx/a) · sin(mπy/b)`, so `n` counts
/// half-waves along the `x` side and `m` along the `y` side.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangularMembrane {
    width: f64,
    height: f64,
    m: f64,
    n: f64,
    stiffness: f64,
    amplitude_scale: f64,
    lambda: f64,
}

impl RectangularMembrane {
    pub fn new(
        width: f64,
        height: f64,
        m: f64,
        n: f64,
        stiffness: f64,
        amplitude_scale: f64,
    ) -> Result<Self> {
        let stiffness = ensure_positive("stiffness", stiffness)?;
        let amplitude_scale = ensure_finite("amplitude", amplitude_scale)?;
        let lambda = Self::compute_lambda(width, height, m, n)?;

        Ok(Self {
            width,
            height,
            m,
            n,
            stiffness,
            amplitude_scale,
            lambda,
        })
    }

    /// Eigenvalue `π / (a b) · sqrt((n b)² + (m a)²)`.
    pub fn compute_lambda(width: f64, height: f64, m: f64, n: f64) -> Result<f64> {
        let a = ensure_positive("width", width)?;
        let b = ensure_positive("height", height)?;
        let m = ensure_positive("mode index m", m)?;
        let n = ensure_positive("mode index n", n)?;
        Ok(PI / (a * b) * ((n * b).powi(2) + (m * a).powi(2)).sqrt())
    }

    /// Side lengths `(a, b)`.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn amplitude_scale(&self) -> f64 {
        self.amplitude_scale
    }
}

impl Membrane for RectangularMembrane {
    fn name(&self) -> &str {
        "Rectangular"
    }

    fn geometry(&self) -> Geometry {
        Geometry::Rectangular {
            width: self.width,
            height: self.height,
        }
    }

    fn wave_numbers(&self) -> WaveNumbers {
        WaveNumbers {
            m: self.m,
            n: self.n,
        }
    }

    fn lambda(&self) -> f64 {
        self.lambda
    }

    fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// The product of sines peaks at exactly one, so the scale is the peak.
    fn amplitude(&self) -> f64 {
        self.amplitude_scale.abs()
    }

    fn normalize(&mut self, target: f64) -> Result<()> {
        self.amplitude_scale = ensure_finite("target amplitude", target)?;
        Ok(())
    }

    fn evaluate(&self, x: f64, y: f64, t: f64) -> f64 {
        self.amplitude_scale
            * (self.n * PI / self.width * x).sin()
            * (self.m * PI / self.height * y).sin()
            * (self.lambda * self.stiffness * t).sin()
    }
}
