use std::path::PathBuf;

use crate::core::messages::MessageKey;

/// Failure kinds surfaced to the user through the message table.
#[derive(Debug, thiserror::Error)]
pub enum V2iError {
    #[error("no video paths were provided")]
    NoInputProvided,

    #[error("cannot open video source: {}", path.display())]
    SourceUnreadable { path: PathBuf },

    #[error("video reports unusable metadata (fps={fps}, frames={frame_count})")]
    InvalidSourceMetadata { fps: f64, frame_count: f64 },

    #[error("unsupported frame format ({channels} channels, depth {depth})")]
    UnsupportedFrameFormat { channels: i32, depth: i32 },

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write frame image {}", path.display())]
    FrameWrite { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl V2iError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            V2iError::NoInputProvided => MessageKey::NoVideoPath,
            V2iError::SourceUnreadable { .. }
            | V2iError::InvalidSourceMetadata { .. }
            | V2iError::UnsupportedFrameFormat { .. } => MessageKey::ErrorOpenVideo,
            V2iError::OutputDir { .. } => MessageKey::OutputDirFailed,
            V2iError::FrameWrite { .. } => MessageKey::WriteFailed,
            V2iError::InvalidConfig(_) => MessageKey::InvalidConfig,
        }
    }

    /// Finds the typed cause inside an `anyhow` chain, if there is one.
    pub fn find_in(err: &anyhow::Error) -> Option<&V2iError> {
        err.chain().find_map(|cause| cause.downcast_ref::<V2iError>())
    }
}
