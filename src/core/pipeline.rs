use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::config::AppConfig;
use crate::core::messages::{MessageKey, MessageTable};
use crate::core::sampler::{self, SampleSettings};
use crate::core::writer;
use crate::decoder::{FrameSource, OpenCvSource};
use crate::errors::V2iError;
use crate::utils::file_utils;
use crate::utils::logger::Log;
use crate::utils::progress::Progress;

/// Everything a run needs, built once in `main`.
pub struct RunContext<'a> {
    pub config: &'a AppConfig,
    pub messages: &'a MessageTable,
    pub log: &'a dyn Log,
    pub output_base: PathBuf,
    pub show_progress: bool,
}

impl RunContext<'_> {
    fn progress(&self, label: &str, total: usize) -> Progress {
        if self.show_progress {
            Progress::new(label, total)
        } else {
            Progress::hidden(label, total)
        }
    }

    fn settings(&self) -> SampleSettings {
        SampleSettings {
            fps: self.config.fps,
            duration: self.config.duration,
            resolution: self.config.resolution,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoReport {
    pub name: String,
    pub output_dir: PathBuf,
    pub frames_written: usize,
    pub requested: u64,
    pub exhausted: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    pub succeeded: Vec<VideoReport>,
    pub failed: Vec<PathBuf>,
}

/// Runs sample-then-save for one already opened source.
pub fn process_source(
    source: &mut dyn FrameSource,
    name: &str,
    ctx: &RunContext<'_>,
) -> Result<VideoReport> {
    let extraction = {
        let mut progress = ctx.progress("sampling", ctx.config.max_frames() as usize);
        sampler::extract(source, ctx.settings(), ctx.log, ctx.messages, &mut progress)?
    };

    let output_dir = file_utils::next_available_dir(&ctx.output_base, name)?;
    ctx.log.info(&format!("saving frames to {}", output_dir.display()));

    let mut progress = ctx.progress("saving", extraction.frames.len());
    writer::write_frames(
        &output_dir,
        &extraction.frames,
        &ctx.config.frame_prefix,
        ctx.config.jpeg_quality,
        ctx.log,
        &mut progress,
    )?;

    let frame_count = extraction.frames.len().to_string();
    let dir_display = output_dir.display().to_string();
    ctx.log.info(&ctx.messages.render(
        MessageKey::FramesSaved,
        &[("frame_count", &frame_count), ("output_dir", &dir_display), ("video_name", name)],
    ));

    Ok(VideoReport {
        name: name.to_string(),
        output_dir,
        frames_written: extraction.frames.len(),
        requested: extraction.requested,
        exhausted: extraction.exhausted,
    })
}

pub fn process_video(path: &Path, position: usize, total: usize, ctx: &RunContext<'_>) -> Result<VideoReport> {
    let name = file_utils::video_display_name(path);
    ctx.log.info(&format!("processing video [{}/{}]: {}", position, total, name));

    // Dropping the source at the end of this scope releases the capture on every path.
    let mut source = OpenCvSource::open(path)?;
    if let Ok((w, h)) = source.dimensions() {
        ctx.log.debug(&format!(
            "opened {}: {}x{}, {:.3}fps, {} frames",
            path.display(),
            w,
            h,
            source.frame_rate(),
            source.frame_count()
        ));
    }

    process_source(&mut source, &name, ctx).with_context(|| format!("while processing {}", path.display()))
}

/// Logs a per-video failure using the message mapped to its kind.
pub fn report_failure(err: &anyhow::Error, ctx: &RunContext<'_>) {
    match V2iError::find_in(err) {
        Some(kind) => ctx.log.error(ctx.messages.message_for(kind.message_key())),
        None => ctx.log.error("unexpected failure"),
    }
    ctx.log.debug(&format!("{:#}", err));
}

/// Processes `paths` one after another. A failing video is logged and skipped.
pub fn run_batch(paths: &[PathBuf], ctx: &RunContext<'_>, mut after_each: impl FnMut()) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let total = paths.len();

    for (i, path) in paths.iter().enumerate() {
        match process_video(path, i + 1, total, ctx) {
            Ok(report) => {
                ctx.log.info(&format!(
                    "finished video {}: {}/{} frames in {}{}",
                    report.name,
                    report.frames_written,
                    report.requested,
                    report.output_dir.display(),
                    if report.exhausted { " (source ended early)" } else { "" }
                ));
                summary.succeeded.push(report);
            }
            Err(err) => {
                report_failure(&err, ctx);
                summary.failed.push(path.clone());
            }
        }
        after_each();
    }

    summary
}
