//! Entry points that turn a membrane into output artifacts.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{AnimationConfig, OutputConfig, PeakPlotConfig};
use crate::membrane::Membrane;
use crate::record::{save_still, Recorder, RecordingSettings};
use crate::render::{FrameRenderer, RenderSettings};
use crate::scene::{SampleGrid, SurfaceScene};
use crate::timeline::Timeline;
use crate::Result;

/// Renders the time evolution of `membrane` into
/// `<animation_dir>/<filename>`. Files ending in `.gif` become looping GIFs,
/// anything else is encoded as H.264 video.
pub fn animate_membrane<M: Membrane + ?Sized>(
    filename: &str,
    membrane: &M,
    config: &AnimationConfig,
    output: &OutputConfig,
) -> Result<PathBuf> {
    config.validate()?;
    std::fs::create_dir_all(&output.animation_dir)?;
    let path = output.animation_dir.join(filename);

    let grid = SampleGrid::for_membrane(membrane, config.grid_resolution)?;
    let timeline = Timeline::spanning(membrane.period(), config.periods, config.frame_count())?;
    let renderer = FrameRenderer::new(RenderSettings::for_animation(config));

    tracing::info!(
        path = %path.display(),
        membrane = membrane.name(),
        modes = %membrane.wave_numbers(),
        frames = timeline.len(),
        "rendering animation"
    );

    let mut recorder = Recorder::start(RecordingSettings {
        output_path: path,
        fps: config.framerate,
        size: config.video_size,
        ffmpeg: output.ffmpeg.clone(),
    })?;

    let progress = progress_bar(timeline.len() as u64, filename);
    for &t in &timeline {
        let scene = SurfaceScene::capture(membrane, &grid, t)?;
        let frame = renderer.render(&scene)?;
        recorder.push_frame(&frame)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    let path = recorder.finish()?;
    tracing::info!(path = %path.display(), "animation written");
    Ok(path)
}

/// Saves a single frame at the quarter-period peak into
/// `<plot_dir>/<filename>`, cropped to the drawn content.
pub fn plot_membrane_peak<M: Membrane + ?Sized>(
    filename: &str,
    membrane: &M,
    config: &PeakPlotConfig,
    output: &OutputConfig,
) -> Result<PathBuf> {
    config.validate()?;
    std::fs::create_dir_all(&output.plot_dir)?;
    let path = output.plot_dir.join(filename);

    let grid = SampleGrid::for_membrane(membrane, config.grid_resolution)?;
    let scene = SurfaceScene::capture(membrane, &grid, Timeline::peak(membrane.period()))?;
    let frame = FrameRenderer::new(RenderSettings::for_peak_plot(config)).render(&scene)?;

    let path = save_still(&frame, &path)?;
    tracing::info!(
        path = %path.display(),
        membrane = membrane.name(),
        modes = %membrane.wave_numbers(),
        "peak plot written"
    );
    Ok(path)
}

fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
    {
        Ok(style) => bar.set_style(style.progress_chars("#>-")),
        Err(err) => tracing::debug!(%err, "falling back to the default progress style"),
    }
    bar.set_message(message.to_string());
    bar
}
