use anyhow::{Context, Result};
use opencv::{core::Vector, imgcodecs};
use std::path::{Path, PathBuf};

use crate::decoder::video::frame_to_mat;
use crate::decoder::Frame;
use crate::errors::V2iError;
use crate::shared::constants;
use crate::utils::logger::Log;
use crate::utils::progress::Progress;

pub fn frame_file_name(prefix: &str, ordinal: usize) -> String {
    format!("{}{}.{}", prefix, ordinal, constants::FRAME_FILE_EXTENSION)
}

/// Writes `frames` as JPEGs named by 1-based position, in order.
pub fn write_frames(
    dir: &Path,
    frames: &[Frame],
    prefix: &str,
    quality: u8,
    log: &dyn Log,
    progress: &mut Progress,
) -> Result<Vec<PathBuf>> {
    let params = Vector::<i32>::from_slice(&[imgcodecs::IMWRITE_JPEG_QUALITY, quality as i32]);
    let mut written = Vec::with_capacity(frames.len());

    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(frame_file_name(prefix, i + 1));
        let path_str = path
            .to_str()
            .ok_or_else(|| V2iError::FrameWrite { path: path.clone() })?;

        let mat = frame_to_mat(frame)?;
        let ok = imgcodecs::imwrite(path_str, &mat, &params)
            .with_context(|| format!("OpenCV failed to encode {:?}", path))?;
        if !ok {
            return Err(V2iError::FrameWrite { path }.into());
        }

        written.push(path);
        progress.inc();
    }
    progress.finish();

    log.debug(&format!("wrote {} images to {}", written.len(), dir.display()));
    Ok(written)
}
