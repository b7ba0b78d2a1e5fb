use std::cmp::Reverse;

use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{AnimationConfig, PeakPlotConfig};
use crate::mapping::HeightColorMap;
use crate::scene::SurfaceScene;
use crate::{MembraneError, Result};

const TITLE_POINTS: f64 = 12.0;
const LABEL_POINTS: f64 = 10.0;
const GRID_POINTS: f64 = 0.5;
const AXIS_POINTS: f64 = 0.8;
const POINTS_PER_INCH: f64 = 72.0;

/// Pixel geometry and camera for a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub size: (u32, u32),
    /// Scales fonts and margins the way a print resolution would.
    pub dpi: u32,
    pub labels: bool,
    /// Camera rotation around the vertical axis, in radians.
    pub yaw: f64,
    /// Camera elevation, in radians.
    pub pitch: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: (800, 600),
            dpi: 100,
            labels: true,
            yaw: 0.6,
            pitch: 0.35,
        }
    }
}

impl RenderSettings {
    pub fn for_animation(config: &AnimationConfig) -> Self {
        Self {
            size: config.video_size,
            dpi: config.video_dpi,
            labels: config.labels,
            ..Self::default()
        }
    }

    pub fn for_peak_plot(config: &PeakPlotConfig) -> Self {
        Self {
            size: config.pixel_size(),
            dpi: config.plot_dpi,
            labels: config.labels,
            ..Self::default()
        }
    }

    /// Converts a typographic size in points into pixels at this DPI.
    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points * self.dpi as f64 / POINTS_PER_INCH
    }

    /// Stroke width in whole pixels, never thinner than one.
    pub fn stroke_width(&self, points: f64) -> u32 {
        self.points_to_pixels(points).round().max(1.0) as u32
    }
}

/// Draws [`SurfaceScene`]s as shaded 3D surfaces into RGB frames.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    settings: RenderSettings,
}

impl FrameRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Renders `scene` into a freshly allocated frame of the configured size.
    pub fn render(&self, scene: &SurfaceScene) -> Result<RgbImage> {
        self.render_cells(scene, self.surface_cells(scene))
    }

    fn render_cells(&self, scene: &SurfaceScene, cells: Vec<SurfaceCell>) -> Result<RgbImage> {
        let (width, height) = self.settings.size;
        if width == 0 || height == 0 {
            return Err(MembraneError::render("frame size must be non-zero"));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, scene, cells)?;
            root.present().map_err(render_error)?;
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| MembraneError::render("frame buffer does not match frame size"))
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        scene: &SurfaceScene,
        mut cells: Vec<SurfaceCell>,
    ) -> Result<()> {
        root.fill(&WHITE).map_err(render_error)?;

        let settings = self.settings;
        let z_limit = scene.z_limit;

        let mut builder = ChartBuilder::on(root);
        builder.margin(settings.points_to_pixels(8.0).round() as u32);
        if settings.labels {
            builder.caption(
                &scene.title,
                ("sans-serif", settings.points_to_pixels(TITLE_POINTS)).into_font(),
            );
        }

        let mut chart = builder
            .build_cartesian_3d(
                scene.x_range.clone(),
                -z_limit..z_limit,
                scene.y_range.clone(),
            )
            .map_err(render_error)?;

        chart.with_projection(|mut pb| {
            pb.yaw = settings.yaw;
            pb.pitch = settings.pitch;
            pb.scale = 0.85;
            pb.into_matrix()
        });

        let label_count = if settings.labels { 5 } else { 0 };
        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15).stroke_width(settings.stroke_width(GRID_POINTS)))
            .bold_grid_style(BLACK.mix(0.4).stroke_width(settings.stroke_width(AXIS_POINTS)))
            .max_light_lines(3)
            .x_labels(label_count)
            .y_labels(label_count)
            .z_labels(label_count)
            .label_style(("sans-serif", settings.points_to_pixels(LABEL_POINTS)).into_font())
            .draw()
            .map_err(render_error)?;

        {
            let coord = chart.as_coord_spec();
            paint_order(&mut cells, |&(x, height, y)| coord.projected_depth(&x, &height, &y));
        }

        chart
            .draw_series(
                cells
                    .into_iter()
                    .map(|cell| Polygon::new(cell.points, cell.color.filled())),
            )
            .map_err(render_error)?;

        if settings.labels {
            let style = ("sans-serif", settings.points_to_pixels(LABEL_POINTS))
                .into_font()
                .color(&BLACK);
            let (x, y) = (&scene.x_range, &scene.y_range);
            chart
                .draw_series(vec![
                    Text::new("X", (x.end, -z_limit, y.start), style.clone()),
                    Text::new("Y", (x.start, -z_limit, y.end), style.clone()),
                    Text::new("Z", (x.start, z_limit, y.start), style),
                ])
                .map_err(render_error)?;
        }

        Ok(())
    }

    /// One filled quad per grid cell, coloured by its mean height.
    fn surface_cells(&self, scene: &SurfaceScene) -> Vec<SurfaceCell> {
        let colormap = HeightColorMap::symmetric(scene.z_limit);
        let (rows, cols) = scene.z.dim();

        let mut cells = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1));
        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols.saturating_sub(1) {
                let corners = [(row, col), (row, col + 1), (row + 1, col + 1), (row + 1, col)];
                let points: Vec<(f64, f64, f64)> = corners
                    .iter()
                    .map(|&index| (scene.x[index], scene.z[index], scene.y[index]))
                    .collect();
                let mean_height = points.iter().map(|p| p.1).sum::<f64>() / 4.0;

                cells.push(SurfaceCell {
                    color: colormap.color(mean_height),
                    points,
                });
            }
        }

        cells
    }
}

/// Quad in chart coordinates `(x, height, y)`.
struct SurfaceCell {
    color: RGBColor,
    points: Vec<(f64, f64, f64)>,
}

/// Painter's order: sorts cells far to near by the summed depth of their
/// corners, where larger depths are further from the viewer.
fn paint_order<F>(cells: &mut [SurfaceCell], depth: F)
where
    F: Fn(&(f64, f64, f64)) -> i32,
{
    cells.sort_by_cached_key(|cell| {
        Reverse(cell.points.iter().map(|p| depth(p) as i64).sum::<i64>())
    });
}

fn render_error<E: std::fmt::Display>(err: E) -> MembraneError {
    MembraneError::render(err.to_string())
}
