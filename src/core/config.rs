use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::messages::{MessageTable, SelectionPolicy};
use crate::errors::V2iError;
use crate::shared::constants;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Settings read once at startup, shared by reference afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fps: u32,
    pub duration: u32,
    /// `None` keeps the decoded frames at their native size.
    pub resolution: Option<Resolution>,
    pub jpeg_quality: u8,
    pub output_prefix: String,
    pub frame_prefix: String,
    pub message_policy: SelectionPolicy,
    pub messages_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub pause_on_exit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: constants::DEFAULT_FPS,
            duration: constants::DEFAULT_DURATION_SECS,
            resolution: Some(Resolution::new(constants::DEFAULT_WIDTH, constants::DEFAULT_HEIGHT)),
            jpeg_quality: constants::DEFAULT_JPEG_QUALITY,
            output_prefix: constants::OUTPUT_DIR_PREFIX.to_string(),
            frame_prefix: constants::FRAME_FILE_PREFIX.to_string(),
            message_policy: SelectionPolicy::Random,
            messages_file: None,
            log_file: None,
            pause_on_exit: true,
        }
    }
}

impl AppConfig {
    /// An explicit path must exist; otherwise the file next to the executable is
    /// used when present, and defaults when not.
    pub fn load(explicit: Option<&Path>, exe_dir: &Path) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidate = exe_dir.join(constants::CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| V2iError::InvalidConfig(format!("{:?}: {}", path, e)))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), V2iError> {
        if self.fps == 0 {
            return Err(V2iError::InvalidConfig("fps must be greater than 0".into()));
        }
        if self.duration == 0 {
            return Err(V2iError::InvalidConfig("duration must be greater than 0".into()));
        }
        if let Some(res) = self.resolution {
            if res.width == 0 || res.height == 0 {
                return Err(V2iError::InvalidConfig(format!("resolution {} has a zero dimension", res)));
            }
        }
        if self.jpeg_quality > 100 {
            return Err(V2iError::InvalidConfig(format!(
                "jpeg_quality {} is outside 0..=100",
                self.jpeg_quality
            )));
        }
        if self.output_prefix.is_empty() || self.frame_prefix.is_empty() {
            return Err(V2iError::InvalidConfig("output_prefix and frame_prefix must not be empty".into()));
        }
        Ok(())
    }

    /// Relative paths in the config resolve against the executable's directory.
    pub fn resolve(&self, exe_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            exe_dir.join(path)
        }
    }

    pub fn output_base(&self, exe_dir: &Path) -> PathBuf {
        exe_dir.join(&self.output_prefix)
    }

    /// A broken `messages_file` is reported as an invalid configuration.
    pub fn messages(&self, exe_dir: &Path) -> Result<MessageTable, V2iError> {
        let table = match &self.messages_file {
            Some(path) => MessageTable::from_path(&self.resolve(exe_dir, path), self.message_policy),
            None => MessageTable::builtin(self.message_policy),
        };
        table.map_err(|e| V2iError::InvalidConfig(format!("{:#}", e)))
    }

    pub fn max_frames(&self) -> u64 {
        self.fps as u64 * self.duration as u64
    }
}
