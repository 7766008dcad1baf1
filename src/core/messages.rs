use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::shared::constants;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    NoVideoPath,
    ErrorOpenVideo,
    VideoEndReached,
    FramesSaved,
    ProcessingFinished,
    OutputDirFailed,
    WriteFailed,
    InvalidConfig,
}

impl MessageKey {
    pub const ALL: [MessageKey; 8] = [
        MessageKey::NoVideoPath,
        MessageKey::ErrorOpenVideo,
        MessageKey::VideoEndReached,
        MessageKey::FramesSaved,
        MessageKey::ProcessingFinished,
        MessageKey::OutputDirFailed,
        MessageKey::WriteFailed,
        MessageKey::InvalidConfig,
    ];
}

/// How a message is picked among the variants stored for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    Random,
    First,
}

#[derive(Debug, Clone)]
pub struct MessageTable {
    entries: HashMap<MessageKey, Vec<String>>,
    policy: SelectionPolicy,
}

impl MessageTable {
    pub fn builtin(policy: SelectionPolicy) -> Result<Self> {
        Self::from_json(constants::DEFAULT_MESSAGES, policy).context("Built-in message table is malformed")
    }

    pub fn from_path(path: &Path, policy: SelectionPolicy) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message table: {:?}", path))?;
        Self::from_json(&raw, policy).with_context(|| format!("Invalid message table: {:?}", path))
    }

    pub fn from_json(raw: &str, policy: SelectionPolicy) -> Result<Self> {
        let entries: HashMap<MessageKey, Vec<String>> = serde_json::from_str(raw)?;
        for key in MessageKey::ALL {
            match entries.get(&key) {
                Some(variants) if !variants.is_empty() => {}
                _ => anyhow::bail!("message table has no entries for {:?}", key),
            }
        }
        Ok(Self { entries, policy })
    }

    pub fn message_for(&self, key: MessageKey) -> &str {
        // Every key is checked non-empty at load time.
        let variants = &self.entries[&key];
        let picked = match self.policy {
            SelectionPolicy::First => variants.first(),
            SelectionPolicy::Random => variants.choose(&mut rand::thread_rng()),
        };
        picked.map(String::as_str).unwrap_or_default()
    }

    /// Picks a message for `key` and fills in its `{name}` placeholders.
    pub fn render(&self, key: MessageKey, args: &[(&str, &str)]) -> String {
        render(self.message_for(key), args)
    }
}

pub fn render(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}
