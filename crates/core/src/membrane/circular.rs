use std::f64::consts::SQRT_2;

use super::{ensure_finite, ensure_positive, Geometry, Membrane, WaveNumbers};
use crate::special::{bessel_j, bessel_j_zero, bessel_jp_zero};
use crate::{MembraneError, Result};

/// Circular membrane clamped along its rim, vibrating in eigenmode `(m, n)`.
///
/// `m` is the order of the Bessel function (number of nodal diameters) and
/// `n` selects its `n`-th positive zero (number of nodal circles, rim
/// included).
#[derive(Debug, Clone, PartialEq)]
pub struct CircularMembrane {
    radius: f64,
    stiffness: f64,
    m: u32,
    n: u32,
    amplitude_scale: f64,
    lambda: f64,
    /// `J_m` at its first positive critical point.
    radial_peak: f64,
}

impl CircularMembrane {
    pub fn new(radius: f64, stiffness: f64, m: u32, n: u32, amplitude_scale: f64) -> Result<Self> {
        let radius = ensure_positive("radius", radius)?;
        let stiffness = ensure_positive("stiffness", stiffness)?;
        let amplitude_scale = ensure_finite("amplitude", amplitude_scale)?;
        let lambda = Self::compute_lambda(radius, m, n)?;
        let radial_peak = bessel_j(m, bessel_jp_zero(m, 1)?);

        Ok(Self {
            radius,
            stiffness,
            m,
            n,
            amplitude_scale,
            lambda,
            radial_peak,
        })
    }

    /// Eigenvalue `α_{m,n} / a` where `α_{m,n}` is the `n`-th positive zero of
    /// `J_m`.
    pub fn compute_lambda(radius: f64, m: u32, n: u32) -> Result<f64> {
        let radius = ensure_positive("radius", radius)?;
        if n == 0 {
            return Err(MembraneError::domain(format!(
                "radial index n must be at least 1, got {n}"
            )));
        }
        Ok(bessel_j_zero(m, n)? / radius)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Angular order `m`.
    pub fn order(&self) -> u32 {
        self.m
    }

    /// Radial index `n`.
    pub fn root_index(&self) -> u32 {
        self.n
    }

    pub fn amplitude_scale(&self) -> f64 {
        self.amplitude_scale
    }
}

impl Membrane for CircularMembrane {
    fn name(&self) -> &str {
        "Circular"
    }

    fn geometry(&self) -> Geometry {
        Geometry::Circular {
            radius: self.radius,
        }
    }

    fn wave_numbers(&self) -> WaveNumbers {
        WaveNumbers {
            m: self.m as f64,
            n: self.n as f64,
        }
    }

    fn lambda(&self) -> f64 {
        self.lambda
    }

    fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Envelope bound `|A · J_m(x*) · √2|`: the first radial extremum of the
    /// Bessel factor times the peak of `cos(mθ) + sin(mθ)`. This is not the
    /// exact maximum of the full mode shape.
    fn amplitude(&self) -> f64 {
        (self.amplitude_scale * self.radial_peak * SQRT_2).abs()
    }

    fn normalize(&mut self, target: f64) -> Result<()> {
        let target = ensure_finite("target amplitude", target)?;
        let current = self.amplitude();
        if current == 0.0 {
            return Err(MembraneError::domain(
                "cannot normalize a membrane with zero amplitude",
            ));
        }
        self.amplitude_scale = self.amplitude_scale / current * target;
        Ok(())
    }

    fn evaluate(&self, r: f64, theta: f64, t: f64) -> f64 {
        let m = self.m as f64;
        self.amplitude_scale
            * bessel_j(self.m, self.lambda * r)
            * (self.stiffness * self.lambda * t).sin()
            * ((m * theta).cos() + (m * theta).sin())
    }
}
