use anyhow::{Context, Result};

use crate::core::config::Resolution;
use crate::core::messages::{MessageKey, MessageTable};
use crate::decoder::{Frame, FrameSource};
use crate::errors::V2iError;
use crate::imaging::crop_and_resize;
use crate::utils::logger::Log;
use crate::utils::progress::Progress;

/// Retiming derived from the source metadata and the requested output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    pub native_duration: f64,
    pub time_scale: f64,
    pub effective_frame_rate: f64,
    pub frame_step: f64,
    pub requested_frames: u64,
}

impl SamplingPlan {
    pub fn new(native_fps: f64, frame_count: f64, target_fps: u32, target_duration: u32) -> Result<Self, V2iError> {
        // A zero count is allowed: every index clamps to 0 and the first read ends the stream.
        if !native_fps.is_finite() || native_fps <= 0.0 || !frame_count.is_finite() || frame_count < 0.0 {
            return Err(V2iError::InvalidSourceMetadata { fps: native_fps, frame_count });
        }

        let native_duration = frame_count.trunc() / native_fps;
        let time_scale = native_duration / target_duration as f64;
        let effective_frame_rate = native_fps * time_scale;
        let frame_step = effective_frame_rate / target_fps as f64;

        Ok(Self {
            native_duration,
            time_scale,
            effective_frame_rate,
            frame_step,
            requested_frames: target_fps as u64 * target_duration as u64,
        })
    }

    /// Source frame for output sample `i`: `floor(i * step) - 1`, clamped to 0.
    ///
    /// The first sample always lands on -1 before clamping.
    pub fn source_index(&self, i: u64) -> u64 {
        let raw = (i as f64 * self.frame_step).floor() as i64 - 1;
        raw.max(0) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSettings {
    pub fps: u32,
    pub duration: u32,
    pub resolution: Option<Resolution>,
}

pub struct Extraction {
    pub frames: Vec<Frame>,
    pub requested: u64,
    /// The source ran out before every requested sample was decoded.
    pub exhausted: bool,
}

/// Samples `settings.fps * settings.duration` frames spread over the whole source.
///
/// Each sample is one seek plus one decode. Running out of frames stops the loop
/// with a single warning and keeps what was collected.
pub fn extract(
    source: &mut dyn FrameSource,
    settings: SampleSettings,
    log: &dyn Log,
    messages: &MessageTable,
    progress: &mut Progress,
) -> Result<Extraction> {
    let plan = SamplingPlan::new(source.frame_rate(), source.frame_count(), settings.fps, settings.duration)?;

    log.debug(&format!(
        "plan: native {:.3}s @ {:.3}fps, scale {:.4} ({:.3}fps effective), step {:.4}, {} samples",
        plan.native_duration,
        source.frame_rate(),
        plan.time_scale,
        plan.effective_frame_rate,
        plan.frame_step,
        plan.requested_frames
    ));

    let mut frames = Vec::with_capacity(plan.requested_frames as usize);
    let mut exhausted = false;

    for i in 0..plan.requested_frames {
        let index = plan.source_index(i);
        let decoded = match source.read_at(index) {
            Ok(decoded) => decoded,
            // A decode failure after the first frame is treated as the end of the stream.
            Err(err) if !frames.is_empty() => {
                log.debug(&format!("decode of frame {} failed, stopping: {:#}", index, err));
                None
            }
            Err(err) => return Err(err.context(format!("Failed to decode frame {}", index))),
        };
        let Some(frame) = decoded else {
            exhausted = true;
            break;
        };

        let frame = match settings.resolution {
            Some(target) => crop_and_resize(&frame, target)
                .with_context(|| format!("Failed to resize frame {} to {}", index, target))?,
            None => frame,
        };

        frames.push(frame);
        progress.inc();
    }
    progress.finish();

    if exhausted {
        log.warn(messages.message_for(MessageKey::VideoEndReached));
        log.debug(&format!(
            "source exhausted after {} of {} samples",
            frames.len(),
            plan.requested_frames
        ));
    }

    Ok(Extraction {
        frames,
        requested: plan.requested_frames,
        exhausted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::messages::SelectionPolicy;
    use crate::decoder::source::testing::SyntheticSource;
    use crate::utils::logger::testing::MemoryLog;
    use crate::utils::logger::Level;

    fn settings(fps: u32, duration: u32, resolution: Option<Resolution>) -> SampleSettings {
        SampleSettings { fps, duration, resolution }
    }

    fn run(source: &mut SyntheticSource, s: SampleSettings) -> (Extraction, MemoryLog) {
        let log = MemoryLog::default();
        let messages = MessageTable::builtin(SelectionPolicy::First).unwrap();
        let mut progress = Progress::hidden("test", 0);
        let out = extract(source, s, &log, &messages, &mut progress).unwrap();
        (out, log)
    }

    #[test]
    fn test_plan_identity_retiming() {
        let plan = SamplingPlan::new(30.0, 450.0, 30, 15).unwrap();
        assert_eq!(plan.native_duration, 15.0);
        assert_eq!(plan.time_scale, 1.0);
        assert_eq!(plan.frame_step, 1.0);
        assert_eq!(plan.requested_frames, 450);
    }

    #[test]
    fn test_plan_compresses_long_source() {
        let plan = SamplingPlan::new(30.0, 1800.0, 30, 15).unwrap();
        assert_eq!(plan.time_scale, 4.0);
        assert_eq!(plan.effective_frame_rate, 120.0);
        assert_eq!(plan.frame_step, 4.0);
        let indices: Vec<u64> = (0..5).map(|i| plan.source_index(i)).collect();
        // -1 clamps to 0
        assert_eq!(indices, vec![0, 3, 7, 11, 15]);
    }

    #[test]
    fn test_plan_rejects_bad_metadata() {
        assert!(SamplingPlan::new(0.0, 100.0, 30, 15).is_err());
        assert!(SamplingPlan::new(f64::NAN, 100.0, 30, 15).is_err());
        assert!(SamplingPlan::new(30.0, -1.0, 30, 15).is_err());
        assert!(SamplingPlan::new(30.0, f64::INFINITY, 30, 15).is_err());
    }

    #[test]
    fn test_fractional_step_indices_never_negative_and_non_decreasing() {
        let plan = SamplingPlan::new(10.0, 50.0, 30, 15).unwrap();
        assert!(plan.frame_step < 1.0);
        let indices: Vec<u64> = (0..plan.requested_frames).map(|i| plan.source_index(i)).collect();
        assert_eq!(indices[0], 0);
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        assert!(*indices.last().unwrap() < 50);
    }

    #[test]
    fn test_identity_extraction_requests_every_frame() {
        let mut source = SyntheticSource::new(30.0, 450);
        let (out, log) = run(&mut source, settings(30, 15, None));

        assert_eq!(out.frames.len(), 450);
        assert!(!out.exhausted);
        let mut expected: Vec<u64> = vec![0];
        expected.extend(0..449);
        assert_eq!(source.requested, expected);
        assert_eq!(log.count(Level::Warning), 0);
    }

    #[test]
    fn test_long_source_skips_frames() {
        let mut source = SyntheticSource::new(30.0, 1800);
        let (out, _) = run(&mut source, settings(30, 15, None));
        assert_eq!(out.frames.len(), 450);
        assert_eq!(&source.requested[..4], &[0, 3, 7, 11]);
        assert_eq!(out.frames[2].buffer[0], 7);
    }

    #[test]
    fn test_short_source_is_stretched_without_exhaustion() {
        let mut source = SyntheticSource::new(10.0, 50);
        let (out, log) = run(&mut source, settings(30, 15, None));
        assert_eq!(out.frames.len(), 450);
        assert!(!out.exhausted);
        assert_eq!(log.count(Level::Warning), 0);
    }

    #[test]
    fn test_early_exhaustion_stops_and_warns_once() {
        // Container claims 50 frames at 10fps but only 30 decode.
        let mut source = SyntheticSource::truncated(10.0, 50, 30);
        let (out, log) = run(&mut source, settings(30, 15, None));

        assert!(out.exhausted);
        assert!(out.frames.len() < 450);
        assert_eq!(out.requested, 450);
        assert_eq!(log.count(Level::Warning), 1);
        // Loop stops at the first failed read.
        assert_eq!(source.requested.len(), out.frames.len() + 1);
        assert_eq!(*source.requested.last().unwrap(), 30);
    }

    #[test]
    fn test_frames_are_resized_when_resolution_given() {
        let mut source = SyntheticSource::new(30.0, 60).with_size(40, 10);
        let (out, _) = run(&mut source, settings(2, 1, Some(Resolution::new(16, 8))));
        assert_eq!(out.frames.len(), 2);
        for frame in &out.frames {
            assert_eq!((frame.width, frame.height), (16, 8));
        }
    }

    #[test]
    fn test_invalid_source_metadata_is_an_error() {
        let mut source = SyntheticSource::new(0.0, 10);
        let log = MemoryLog::default();
        let messages = MessageTable::builtin(SelectionPolicy::First).unwrap();
        let mut progress = Progress::hidden("test", 0);
        let err = extract(&mut source, settings(30, 15, None), &log, &messages, &mut progress)
            .err()
            .unwrap();
        assert!(matches!(V2iError::find_in(&err), Some(V2iError::InvalidSourceMetadata { .. })));
        assert!(source.requested.is_empty());
    }

    #[test]
    fn test_empty_source_ends_with_warning_not_error() {
        let mut source = SyntheticSource::new(30.0, 0);
        let (out, log) = run(&mut source, settings(30, 15, None));

        assert!(out.frames.is_empty());
        assert!(out.exhausted);
        assert_eq!(log.count(Level::Warning), 1);
        assert_eq!(log.count(Level::Error), 0);
        assert_eq!(source.requested, vec![0]);
    }

    #[test]
    fn test_decode_error_mid_stream_keeps_collected_frames() {
        let mut source = SyntheticSource::new(30.0, 450).failing_from(10);
        let (out, log) = run(&mut source, settings(30, 15, None));

        assert!(out.exhausted);
        assert_eq!(out.frames.len(), 11);
        assert_eq!(log.count(Level::Warning), 1);
    }

    #[test]
    fn test_decode_error_on_first_frame_is_an_error() {
        let mut source = SyntheticSource::new(30.0, 450).failing_from(0);
        let log = MemoryLog::default();
        let messages = MessageTable::builtin(SelectionPolicy::First).unwrap();
        let mut progress = Progress::hidden("test", 0);
        assert!(extract(&mut source, settings(30, 15, None), &log, &messages, &mut progress).is_err());
    }
}
