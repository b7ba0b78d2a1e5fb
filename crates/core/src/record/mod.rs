use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{imageops, Delay, DynamicImage, Frame, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::{MembraneError, Result};

const GIF_ENCODER_SPEED: i32 = 10;
/// Padding kept around the content of a cropped still, in pixels.
const CROP_MARGIN: u32 = 8;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Container chosen for an animation, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Gif,
    /// H.264 video encoded by an external `ffmpeg` process.
    Video,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gif") => OutputFormat::Gif,
            _ => OutputFormat::Video,
        }
    }
}

/// Configuration options for the recording subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSettings {
    pub output_path: PathBuf,
    pub fps: u32,
    pub size: (u32, u32),
    pub ffmpeg: PathBuf,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            output_path: PathBuf::new(),
            fps: 30,
            size: (800, 600),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

enum Sink {
    /// Frames are kept until `finish` so that every write of the encoded
    /// file is checked.
    Gif(Vec<RgbImage>),
    Video {
        child: Child,
        stdin: Option<ChildStdin>,
    },
}

/// Scoped writer that appends rendered frames to a single output artifact.
///
/// The artifact is opened by [`Recorder::start`] and closed by
/// [`Recorder::finish`]. A recorder dropped before `finish` (for example when
/// frame generation fails) stops any encoder process and deletes the
/// partially written file.
pub struct Recorder {
    settings: RecordingSettings,
    format: OutputFormat,
    sink: Option<Sink>,
    frames_written: usize,
    finished: bool,
}

impl Recorder {
    pub fn start(settings: RecordingSettings) -> Result<Self> {
        let (width, height) = settings.size;
        if width == 0 || height == 0 || settings.fps == 0 {
            return Err(MembraneError::export(format!(
                "cannot record {width}x{height} frames at {} fps",
                settings.fps
            )));
        }

        let format = OutputFormat::from_path(&settings.output_path);
        let sink = match format {
            OutputFormat::Gif => {
                File::create(&settings.output_path)?;
                Sink::Gif(Vec::new())
            }
            OutputFormat::Video => spawn_encoder(&settings)?,
        };

        tracing::debug!(
            path = %settings.output_path.display(),
            ?format,
            fps = settings.fps,
            "recorder started"
        );

        Ok(Self {
            settings,
            format,
            sink: Some(sink),
            frames_written: 0,
            finished: false,
        })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn output_path(&self) -> &Path {
        &self.settings.output_path
    }

    pub fn push_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != self.settings.size {
            return Err(MembraneError::export(format!(
                "frame is {:?} but the recording expects {:?}",
                frame.dimensions(),
                self.settings.size
            )));
        }

        match self.sink.as_mut() {
            Some(Sink::Gif(frames)) => frames.push(frame.clone()),
            Some(Sink::Video { stdin, .. }) => {
                let pipe = stdin
                    .as_mut()
                    .ok_or_else(|| MembraneError::export("video encoder input is closed"))?;
                pipe.write_all(frame.as_raw()).map_err(|err| {
                    MembraneError::export(format!("video encoder stopped accepting frames: {err}"))
                })?;
            }
            None => return Err(MembraneError::export("recorder has already been finished")),
        }

        self.frames_written += 1;
        Ok(())
    }

    /// Flushes and closes the artifact, returning its path.
    pub fn finish(mut self) -> Result<PathBuf> {
        match self.sink.take() {
            Some(Sink::Gif(frames)) => {
                let bytes = encode_gif(frames, self.settings.fps)?;
                std::fs::write(&self.settings.output_path, bytes).map_err(|err| {
                    MembraneError::export(format!(
                        "failed to write {}: {err}",
                        self.settings.output_path.display()
                    ))
                })?;
            }
            Some(Sink::Video { child, stdin }) => {
                drop(stdin);
                let output = child.wait_with_output()?;
                if !output.status.success() {
                    return Err(MembraneError::export(format!(
                        "{} exited with {}: {}",
                        self.settings.ffmpeg.display(),
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    )));
                }
            }
            None => return Err(MembraneError::export("recorder has already been finished")),
        }

        self.finished = true;
        tracing::debug!(
            path = %self.settings.output_path.display(),
            frames = self.frames_written,
            "recorder finished"
        );
        Ok(self.settings.output_path.clone())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        if let Some(Sink::Video { mut child, stdin }) = self.sink.take() {
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
        }

        if std::fs::remove_file(&self.settings.output_path).is_ok() {
            tracing::warn!(
                path = %self.settings.output_path.display(),
                "removed partially written artifact"
            );
        }
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("settings", &self.settings)
            .field("format", &self.format)
            .field("frames_written", &self.frames_written)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Encodes a looping GIF in memory.
fn encode_gif(frames: Vec<RgbImage>, fps: u32) -> Result<Vec<u8>> {
    let delay = Delay::from_numer_denom_ms(1000, fps);
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_ENCODER_SPEED);
        encoder.set_repeat(Repeat::Infinite)?;
        for frame in frames {
            let rgba = DynamicImage::ImageRgb8(frame).into_rgba8();
            encoder.encode_frame(Frame::from_parts(rgba, 0, 0, delay))?;
        }
    }
    Ok(bytes)
}

fn spawn_encoder(settings: &RecordingSettings) -> Result<Sink> {
    let (width, height) = settings.size;
    let mut child = Command::new(&settings.ffmpeg)
        .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"])
        .arg("-s")
        .arg(format!("{width}x{height}"))
        .arg("-r")
        .arg(settings.fps.to_string())
        .args(["-i", "-", "-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"])
        .arg(&settings.output_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| {
            MembraneError::export(format!(
                "failed to launch video encoder `{}`: {err}",
                settings.ffmpeg.display()
            ))
        })?;

    let stdin = child.stdin.take();
    Ok(Sink::Video { child, stdin })
}

/// Crops `image` to the bounding box of its non-background pixels plus a
/// small margin. Blank images are returned unchanged.
pub fn crop_to_content(image: &RgbImage) -> RgbImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel == BACKGROUND {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return image.clone();
    };

    let left = x0.saturating_sub(CROP_MARGIN);
    let top = y0.saturating_sub(CROP_MARGIN);
    let right = (x1 + CROP_MARGIN).min(image.width() - 1);
    let bottom = (y1 + CROP_MARGIN).min(image.height() - 1);

    imageops::crop_imm(image, left, top, right - left + 1, bottom - top + 1).to_image()
}

/// Writes a tightly cropped PNG still.
pub fn save_still(image: &RgbImage, path: &Path) -> Result<PathBuf> {
    let cropped = crop_to_content(image);
    if let Err(err) = cropped.save_with_format(path, ImageFormat::Png) {
        let _ = std::fs::remove_file(path);
        return Err(err.into());
    }
    Ok(path.to_path_buf())
}
