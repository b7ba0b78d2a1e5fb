//! Closed-form eigenmode solvers for clamped membranes.

mod circular;
mod rectangular;

use std::f64::consts::PI;
use std::fmt;

use ndarray::{Array, ArrayView, Dimension, Zip};
use serde::{Deserialize, Serialize};

use crate::{MembraneError, Result};

pub use circular::CircularMembrane;
pub use rectangular::RectangularMembrane;

/// Extent of the membrane, used to lay out sampling grids and plot axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Circular { radius: f64 },
    Rectangular { width: f64, height: f64 },
}

impl Geometry {
    pub fn label(&self) -> &'static str {
        match self {
            Geometry::Circular { .. } => "Circular",
            Geometry::Rectangular { .. } => "Rectangular",
        }
    }
}

/// Mode indices `(m, n)` of an eigenmode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveNumbers {
    pub m: f64,
    pub n: f64,
}

impl fmt::Display for WaveNumbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.m, self.n)
    }
}

/// Capability set shared by every membrane model.
///
/// `evaluate` takes the native coordinates of the geometry: `(r, θ)` for a
/// circular membrane and `(x, y)` for a rectangular one.
pub trait Membrane: fmt::Debug {
    /// Human readable model name.
    fn name(&self) -> &str;

    fn geometry(&self) -> Geometry;

    fn wave_numbers(&self) -> WaveNumbers;

    /// Eigenvalue λ linking the spatial mode shape to its temporal frequency.
    fn lambda(&self) -> f64;

    fn stiffness(&self) -> f64;

    /// Characteristic peak displacement used to scale colours and axes.
    fn amplitude(&self) -> f64;

    /// Rescales the solution so that [`Membrane::amplitude`] equals `target`.
    fn normalize(&mut self, target: f64) -> Result<()>;

    /// Displacement at a point and instant.
    fn evaluate(&self, u: f64, v: f64, t: f64) -> f64;

    /// Time to complete one full oscillation, `2π / (c λ)`.
    fn period(&self) -> f64 {
        2.0 * PI / (self.stiffness() * self.lambda())
    }

    /// Natural frequency in cycles per unit time.
    fn frequency(&self) -> f64 {
        1.0 / self.period()
    }
}

/// Evaluates `membrane` element-wise over two equally shaped coordinate
/// arrays. The output has the same shape as the inputs.
pub fn evaluate_field<M, D>(
    membrane: &M,
    u: ArrayView<'_, f64, D>,
    v: ArrayView<'_, f64, D>,
    t: f64,
) -> Result<Array<f64, D>>
where
    M: Membrane + ?Sized,
    D: Dimension,
{
    if u.shape() != v.shape() {
        return Err(MembraneError::domain(format!(
            "coordinate arrays must share a shape, got {:?} and {:?}",
            u.shape(),
            v.shape()
        )));
    }

    Ok(Zip::from(&u)
        .and(&v)
        .map_collect(|&u, &v| membrane.evaluate(u, v, t)))
}

/// Parameters for constructing a membrane, optionally normalized to a target
/// amplitude right after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembraneParams {
    Circular {
        radius: f64,
        stiffness: f64,
        m: u32,
        n: u32,
        #[serde(default = "unit_amplitude")]
        amplitude: f64,
        #[serde(default)]
        normalize: Option<f64>,
    },
    Rectangular {
        width: f64,
        height: f64,
        m: f64,
        n: f64,
        stiffness: f64,
        #[serde(default = "unit_amplitude")]
        amplitude: f64,
        #[serde(default)]
        normalize: Option<f64>,
    },
}

fn unit_amplitude() -> f64 {
    1.0
}

impl MembraneParams {
    pub fn build(&self) -> Result<Box<dyn Membrane>> {
        let (mut membrane, normalize): (Box<dyn Membrane>, Option<f64>) = match *self {
            MembraneParams::Circular {
                radius,
                stiffness,
                m,
                n,
                amplitude,
                normalize,
            } => (
                Box::new(CircularMembrane::new(radius, stiffness, m, n, amplitude)?),
                normalize,
            ),
            MembraneParams::Rectangular {
                width,
                height,
                m,
                n,
                stiffness,
                amplitude,
                normalize,
            } => (
                Box::new(RectangularMembrane::new(
                    width, height, m, n, stiffness, amplitude,
                )?),
                normalize,
            ),
        };

        if let Some(target) = normalize {
            membrane.normalize(target)?;
        }
        Ok(membrane)
    }
}

pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MembraneError::domain(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MembraneError::domain(format!(
            "{name} must be finite, got {value}"
        )))
    }
}
