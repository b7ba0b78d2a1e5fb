//! Core library for rendering the eigenmodes of vibrating membranes.
//!
//! The closed-form mode solvers live in [`membrane`] and depend only on the
//! Bessel machinery in [`special`]. Everything else consumes them through the
//! [`Membrane`] trait: [`scene`] samples a solver over a spatial grid,
//! [`render`] draws the resulting height field, [`record`] encodes frames into
//! GIF, video or PNG artifacts, and [`pipeline`] wires those steps together.
//! [`sweep`] batches the pipeline over a grid of low-order modes.
//!
//! ```rust
//! use membrane_modes_core::{CircularMembrane, Membrane};
//!
//! let mut drum = CircularMembrane::new(1.0, 1.0, 0, 1, 1.0)?;
//! drum.normalize(0.5)?;
//! assert!((drum.amplitude() - 0.5).abs() < 1e-12);
//! let peak = drum.evaluate(0.0, 0.0, drum.period() / 4.0);
//! assert!(peak > 0.0);
//! # Ok::<(), membrane_modes_core::MembraneError>(())
//! ```

pub mod config;
pub mod error;
pub mod mapping;
pub mod membrane;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod scene;
pub mod special;
pub mod sweep;
pub mod timeline;

pub use config::{AnimationConfig, AppConfig, OutputConfig, PeakPlotConfig};
pub use error::{MembraneError, Result};
pub use mapping::HeightColorMap;
pub use membrane::{
    evaluate_field, CircularMembrane, Geometry, Membrane, MembraneParams, RectangularMembrane,
    WaveNumbers,
};
pub use pipeline::{animate_membrane, plot_membrane_peak};
pub use record::{OutputFormat, Recorder, RecordingSettings};
pub use render::{FrameRenderer, RenderSettings};
pub use scene::{SampleGrid, SurfaceScene};
pub use sweep::{Artifact, ModeSweep, SweepReport};
pub use timeline::Timeline;
