use std::f64::consts::PI;
use std::ops::Range;

use ndarray::{Array2, Zip};

use crate::membrane::{evaluate_field, Geometry, Membrane};
use crate::timeline::linspace;
use crate::{MembraneError, Result};

/// Headroom applied to the amplitude when choosing colour and axis limits.
const AXIS_HEADROOM: f64 = 1.1;

/// Spatial sampling of a membrane.
///
/// `u`/`v` hold the native coordinates handed to [`Membrane::evaluate`]:
/// `(r, θ)` for circular geometries and `(x, y)` for rectangular ones.
/// `x`/`y` are the matching Cartesian positions used for display. Rows index
/// the second coordinate, columns the first.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    geometry: Geometry,
    u: Array2<f64>,
    v: Array2<f64>,
    x: Array2<f64>,
    y: Array2<f64>,
}

impl SampleGrid {
    pub fn new(geometry: Geometry, resolution: usize) -> Result<Self> {
        if resolution < 2 {
            return Err(MembraneError::domain(format!(
                "grid resolution must be at least 2, got {resolution}"
            )));
        }

        let grid = match geometry {
            Geometry::Circular { radius } => {
                let (r, theta) = meshgrid(
                    &linspace(0.0, radius, resolution),
                    &linspace(0.0, 2.0 * PI, resolution),
                );
                let x = Zip::from(&r).and(&theta).map_collect(|&r, &t| r * t.cos());
                let y = Zip::from(&r).and(&theta).map_collect(|&r, &t| r * t.sin());
                Self {
                    geometry,
                    u: r,
                    v: theta,
                    x,
                    y,
                }
            }
            Geometry::Rectangular { width, height } => {
                let (x, y) = meshgrid(
                    &linspace(0.0, width, resolution),
                    &linspace(0.0, height, resolution),
                );
                Self {
                    geometry,
                    u: x.clone(),
                    v: y.clone(),
                    x,
                    y,
                }
            }
        };

        Ok(grid)
    }

    pub fn for_membrane<M: Membrane + ?Sized>(membrane: &M, resolution: usize) -> Result<Self> {
        Self::new(membrane.geometry(), resolution)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn dim(&self) -> (usize, usize) {
        self.u.dim()
    }

    pub fn native(&self) -> (&Array2<f64>, &Array2<f64>) {
        (&self.u, &self.v)
    }

    pub fn cartesian(&self) -> (&Array2<f64>, &Array2<f64>) {
        (&self.x, &self.y)
    }

    /// Horizontal extents `(x, y)` of the geometry in display coordinates.
    pub fn extent(&self) -> (Range<f64>, Range<f64>) {
        match self.geometry {
            Geometry::Circular { radius } => (-radius..radius, -radius..radius),
            Geometry::Rectangular { width, height } => (0.0..width, 0.0..height),
        }
    }
}

/// Equivalent of `meshgrid(first, second)`: output shape is
/// `(second.len(), first.len())`.
fn meshgrid(first: &[f64], second: &[f64]) -> (Array2<f64>, Array2<f64>) {
    let shape = (second.len(), first.len());
    (
        Array2::from_shape_fn(shape, |(_, col)| first[col]),
        Array2::from_shape_fn(shape, |(row, _)| second[row]),
    )
}

/// Height field of a membrane captured at a single instant, ready to draw.
#[derive(Debug, Clone)]
pub struct SurfaceScene {
    pub title: String,
    pub time: f64,
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    /// Symmetric limit for the vertical axis and colour scale.
    pub z_limit: f64,
}

impl SurfaceScene {
    pub fn capture<M: Membrane + ?Sized>(membrane: &M, grid: &SampleGrid, t: f64) -> Result<Self> {
        let z_limit = membrane.amplitude() * AXIS_HEADROOM;
        if !(z_limit.is_finite() && z_limit > 0.0) {
            return Err(MembraneError::domain(format!(
                "membrane amplitude must be positive to scale the plot, got {}",
                membrane.amplitude()
            )));
        }

        let (u, v) = grid.native();
        let z = evaluate_field(membrane, u.view(), v.view(), t)?;
        let (x, y) = grid.cartesian();
        let (x_range, y_range) = grid.extent();

        Ok(Self {
            title: title_for(membrane),
            time: t,
            x: x.clone(),
            y: y.clone(),
            z,
            x_range,
            y_range,
            z_limit,
        })
    }
}

/// Caption such as `Circular Membrane, (0,1) Mode`.
pub fn title_for<M: Membrane + ?Sized>(membrane: &M) -> String {
    format!(
        "{} Membrane, {} Mode",
        membrane.geometry().label(),
        membrane.wave_numbers()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membrane::{CircularMembrane, RectangularMembrane};
    use approx::assert_relative_eq;

    #[test]
    fn polar_grid_projects_to_cartesian() {
        let grid = SampleGrid::new(Geometry::Circular { radius: 2.0 }, 5).unwrap();
        let (r, theta) = grid.native();
        let (x, y) = grid.cartesian();

        assert_eq!(grid.dim(), (5, 5));
        // Rows sweep the angle, columns the radius.
        assert_eq!(r[[0, 4]], 2.0);
        assert_relative_eq!(theta[[4, 0]], 2.0 * PI);
        assert_relative_eq!(x[[1, 4]], 2.0 * (PI / 2.0).cos(), epsilon = 1e-15);
        assert_relative_eq!(y[[1, 4]], 2.0, epsilon = 1e-15);
    }

    #[test]
    fn rectangular_grid_spans_the_sides() {
        let grid = SampleGrid::new(
            Geometry::Rectangular {
                width: 1.0,
                height: 2.0,
            },
            3,
        )
        .unwrap();
        let (x, y) = grid.cartesian();

        assert_eq!(x[[0, 2]], 1.0);
        assert_eq!(y[[2, 0]], 2.0);
        assert_eq!(grid.extent(), (0.0..1.0, 0.0..2.0));
    }

    #[test]
    fn rejects_tiny_grids() {
        assert!(SampleGrid::new(Geometry::Circular { radius: 1.0 }, 1).is_err());
    }

    #[test]
    fn captures_peak_displacement() {
        let membrane = RectangularMembrane::new(1.0, 2.0, 1.0, 1.0, 1.0, 0.5).unwrap();
        let grid = SampleGrid::for_membrane(&membrane, 5).unwrap();
        let scene = SurfaceScene::capture(&membrane, &grid, membrane.period() / 4.0).unwrap();

        assert_eq!(scene.title, "Rectangular Membrane, (1,1) Mode");
        assert_relative_eq!(scene.z[[2, 2]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(scene.z_limit, 0.55, epsilon = 1e-12);
    }

    #[test]
    fn zero_amplitude_cannot_be_scaled() {
        let membrane = CircularMembrane::new(1.0, 1.0, 0, 1, 0.0).unwrap();
        let grid = SampleGrid::for_membrane(&membrane, 4).unwrap();
        assert!(matches!(
            SurfaceScene::capture(&membrane, &grid, 0.1),
            Err(MembraneError::Domain(_))
        ));
    }
}
