use anyhow::Result;
use opencv::{core, prelude::*, videoio};
use std::path::Path;

use super::frame_data::{Frame, CHANNELS};
use super::source::FrameSource;
use crate::errors::V2iError;

/// `VideoCapture`-backed source. The capture is released when this is dropped.
pub struct OpenCvSource {
    capture: videoio::VideoCapture,
    fps: f64,
    frame_count: f64,
}

impl OpenCvSource {
    pub fn open(path: &Path) -> Result<Self> {
        let unreadable = || V2iError::SourceUnreadable { path: path.to_path_buf() };

        let path_str = path.to_str().ok_or_else(unreadable)?;
        // CAP_ANY lets OpenCV pick the backend for the platform
        let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .map_err(|_| unreadable())?;

        if !capture.is_opened()? {
            return Err(unreadable().into());
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;

        Ok(Self { capture, fps, frame_count })
    }

    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let w = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let h = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        Ok((w, h))
    }
}

impl FrameSource for OpenCvSource {
    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn frame_count(&self) -> f64 {
        self.frame_count
    }

    fn read_at(&mut self, index: u64) -> Result<Option<Frame>> {
        self.capture.set(videoio::CAP_PROP_POS_FRAMES, index as f64)?;

        let mut mat = Mat::default();
        if !self.capture.read(&mut mat)? || mat.empty() {
            return Ok(None);
        }

        mat_to_frame(&mat).map(Some)
    }
}

impl Drop for OpenCvSource {
    fn drop(&mut self) {
        let _ = self.capture.release();
    }
}

fn mat_to_frame(mat: &Mat) -> Result<Frame> {
    if mat.channels() != CHANNELS as i32 || mat.depth() != core::CV_8U {
        return Err(V2iError::UnsupportedFrameFormat {
            channels: mat.channels(),
            depth: mat.depth(),
        }
        .into());
    }

    let width = mat.cols() as u32;
    let height = mat.rows() as u32;
    let buffer = if mat.is_continuous() {
        mat.data_bytes()?.to_vec()
    } else {
        mat.try_clone()?.data_bytes()?.to_vec()
    };

    Ok(Frame::new(buffer, width, height))
}

/// Copies a frame into a freshly allocated `CV_8UC3` matrix.
pub fn frame_to_mat(frame: &Frame) -> Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height as i32,
        frame.width as i32,
        core::CV_8UC3,
        core::Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(&frame.buffer);
    Ok(mat)
}
