use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{AnimationConfig, OutputConfig, PeakPlotConfig};
use crate::membrane::MembraneParams;
use crate::pipeline::{animate_membrane, plot_membrane_peak};
use crate::MembraneError;

/// Kind of artifact produced for every mode in a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Artifact {
    #[default]
    Animation,
    PeakPlot,
}

impl Artifact {
    pub fn extension(&self) -> &'static str {
        match self {
            Artifact::Animation => "gif",
            Artifact::PeakPlot => "png",
        }
    }
}

/// A single artifact scheduled by a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepJob {
    pub filename: String,
    pub membrane: MembraneParams,
    pub animation: AnimationConfig,
}

/// Grid of low-order modes rendered for both membrane shapes.
///
/// Circular modes use a unit radius and stiffness with `m ∈ [0, max_index)`
/// and `n ∈ [1, max_index]`, normalized to `target_amplitude`. Rectangular
/// modes use a 1×2 membrane with `m, n ∈ [1, max_index]` and the target as
/// their amplitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSweep {
    pub artifact: Artifact,
    pub max_index: u32,
    pub target_amplitude: f64,
    pub circular_animation: AnimationConfig,
    pub rectangular_animation: AnimationConfig,
}

impl ModeSweep {
    /// Sweep with the stock animation settings layered over `base`: one
    /// period over two seconds, square frames at 800px/128dpi for circular
    /// modes and 1600px/400dpi for rectangular ones.
    pub fn new(artifact: Artifact, base: &AnimationConfig) -> Self {
        let stock = AnimationConfig {
            periods: 1,
            runtime: 2.0,
            ..base.clone()
        };
        Self {
            artifact,
            max_index: 3,
            target_amplitude: 0.5,
            circular_animation: AnimationConfig {
                video_size: (800, 800),
                video_dpi: 128,
                ..stock.clone()
            },
            rectangular_animation: AnimationConfig {
                video_size: (1600, 1600),
                video_dpi: 400,
                ..stock
            },
        }
    }

    pub fn jobs(&self) -> Vec<SweepJob> {
        let extension = self.artifact.extension();
        let mut jobs = Vec::new();

        for m in 0..self.max_index {
            for n in 1..=self.max_index {
                jobs.push(SweepJob {
                    filename: format!("circular{m}{n}.{extension}"),
                    membrane: MembraneParams::Circular {
                        radius: 1.0,
                        stiffness: 1.0,
                        m,
                        n,
                        amplitude: 1.0,
                        normalize: Some(self.target_amplitude),
                    },
                    animation: self.circular_animation.clone(),
                });
            }
        }

        for m in 1..=self.max_index {
            for n in 1..=self.max_index {
                jobs.push(SweepJob {
                    filename: format!("rectangular{m}{n}.{extension}"),
                    membrane: MembraneParams::Rectangular {
                        width: 1.0,
                        height: 2.0,
                        m: m as f64,
                        n: n as f64,
                        stiffness: 1.0,
                        amplitude: self.target_amplitude,
                        normalize: None,
                    },
                    animation: self.rectangular_animation.clone(),
                });
            }
        }

        jobs
    }

    /// Produces every artifact in turn. A failing artifact is logged and
    /// recorded; the sweep moves on to the next one.
    pub fn run(&self, peak_plot: &PeakPlotConfig, output: &OutputConfig) -> SweepReport {
        let mut report = SweepReport::default();

        for job in self.jobs() {
            let result = job.membrane.build().and_then(|membrane| match self.artifact {
                Artifact::Animation => {
                    animate_membrane(&job.filename, membrane.as_ref(), &job.animation, output)
                }
                Artifact::PeakPlot => {
                    plot_membrane_peak(&job.filename, membrane.as_ref(), peak_plot, output)
                }
            });

            match result {
                Ok(path) => report.written.push(path),
                Err(error) => {
                    tracing::warn!(filename = %job.filename, %error, "skipping artifact");
                    report.failed.push(SweepFailure {
                        filename: job.filename,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            written = report.written.len(),
            failed = report.failed.len(),
            "sweep complete"
        );
        report
    }
}

#[derive(Debug)]
pub struct SweepFailure {
    pub filename: String,
    pub error: MembraneError,
}

/// Outcome of a sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedules_both_shapes() {
        let sweep = ModeSweep::new(Artifact::Animation, &AnimationConfig::default());
        let jobs = sweep.jobs();

        assert_eq!(jobs.len(), 18);
        assert_eq!(jobs[0].filename, "circular01.gif");
        assert_eq!(jobs[8].filename, "circular23.gif");
        assert_eq!(jobs[9].filename, "rectangular11.gif");
        assert_eq!(jobs[17].filename, "rectangular33.gif");
        assert_eq!(jobs[0].animation.video_size, (800, 800));
        assert_eq!(jobs[9].animation.video_dpi, 400);
        assert_eq!(jobs[9].animation.periods, 1);
    }

    #[test]
    fn peak_plots_use_png_names() {
        let sweep = ModeSweep::new(Artifact::PeakPlot, &AnimationConfig::default());
        assert!(sweep.jobs().iter().all(|job| job.filename.ends_with(".png")));
    }

    #[test]
    fn continues_past_failed_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            animation_dir: dir.path().join("anim"),
            plot_dir: dir.path().join("output"),
            ..OutputConfig::default()
        };
        let peak_plot = PeakPlotConfig {
            grid_resolution: 5,
            plot_dpi: 10,
            labels: false,
            ..PeakPlotConfig::default()
        };

        let mut sweep = ModeSweep::new(Artifact::Animation, &AnimationConfig::default());
        sweep.max_index = 1;
        sweep.circular_animation.grid_resolution = 1;
        sweep.rectangular_animation = AnimationConfig {
            grid_resolution: 5,
            video_size: (32, 32),
            video_dpi: 72,
            framerate: 2,
            runtime: 1.0,
            periods: 1,
            labels: false,
        };

        let report = sweep.run(&peak_plot, &output);

        assert!(!report.is_success());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].filename, "circular01.gif");
        assert!(matches!(report.failed[0].error, MembraneError::Config(_)));
        assert_eq!(report.written, vec![output.animation_dir.join("rectangular11.gif")]);
    }
}
