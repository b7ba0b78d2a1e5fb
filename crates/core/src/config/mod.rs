use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{MembraneError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub animation: AnimationConfig,
    pub peak_plot: PeakPlotConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Loads a JSON configuration file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.animation.validate()?;
        self.peak_plot.validate()
    }
}

/// Options recognised by the animation entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Samples per axis of the spatial grid.
    pub grid_resolution: usize,
    /// Output frame size in pixels.
    pub video_size: (u32, u32),
    /// Controls font and line scale.
    pub video_dpi: u32,
    pub framerate: u32,
    /// Wall-clock length of the animation in seconds.
    pub runtime: f64,
    /// Number of oscillation periods spanned by the animation.
    pub periods: u32,
    pub labels: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 400,
            video_size: (800, 600),
            video_dpi: 128,
            framerate: 30,
            runtime: 5.0,
            periods: 2,
            labels: true,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        validate_resolution(self.grid_resolution)?;
        if self.video_size.0 == 0 || self.video_size.1 == 0 {
            return Err(MembraneError::config("video_size must be non-zero"));
        }
        if self.video_dpi == 0 {
            return Err(MembraneError::config("video_dpi must be non-zero"));
        }
        if self.framerate == 0 {
            return Err(MembraneError::config("framerate must be non-zero"));
        }
        if !(self.runtime.is_finite() && self.runtime > 0.0) {
            return Err(MembraneError::config(format!(
                "runtime must be positive, got {}",
                self.runtime
            )));
        }
        if self.periods == 0 {
            return Err(MembraneError::config("periods must be non-zero"));
        }
        Ok(())
    }

    /// Number of frames the animation will contain.
    pub fn frame_count(&self) -> usize {
        (self.framerate as f64 * self.runtime).floor() as usize
    }
}

/// Options recognised by the static peak-displacement plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakPlotConfig {
    pub grid_resolution: usize,
    pub plot_dpi: u32,
    /// Canvas size in inches before cropping.
    pub figure_size: (f64, f64),
    pub labels: bool,
}

impl Default for PeakPlotConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 400,
            plot_dpi: 400,
            figure_size: (6.4, 4.8),
            labels: true,
        }
    }
}

impl PeakPlotConfig {
    pub fn validate(&self) -> Result<()> {
        validate_resolution(self.grid_resolution)?;
        if self.plot_dpi == 0 {
            return Err(MembraneError::config("plot_dpi must be non-zero"));
        }
        let (w, h) = self.figure_size;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(MembraneError::config(format!(
                "figure_size must be positive, got ({w}, {h})"
            )));
        }
        if self.pixel_size().0 == 0 || self.pixel_size().1 == 0 {
            return Err(MembraneError::config("figure is smaller than one pixel"));
        }
        Ok(())
    }

    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.plot_dpi as f64;
        (
            (self.figure_size.0 * dpi).round() as u32,
            (self.figure_size.1 * dpi).round() as u32,
        )
    }
}

/// Where artifacts are written and which external encoder is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub animation_dir: PathBuf,
    pub plot_dir: PathBuf,
    /// `ffmpeg` executable used for video output.
    pub ffmpeg: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            animation_dir: PathBuf::from("anim"),
            plot_dir: PathBuf::from("output"),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

fn validate_resolution(resolution: usize) -> Result<()> {
    if resolution < 2 {
        return Err(MembraneError::config(format!(
            "grid_resolution must be at least 2, got {resolution}"
        )));
    }
    Ok(())
}
