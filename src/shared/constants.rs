pub const APP_NAME: &str = "V2I";
pub const APP_DESCRIPTION: &str = "Turns videos into fixed-length image sequences";
pub const APP_AUTHOR: &str = "QuickLAW";
pub const PROJECT_LINK: &str = "https://github.com/QuickLAW/V2I-for-WW/";
pub const AUTHOR_LINK: &str = "https://github.com/QuickLAW";

pub const CONFIG_FILE: &str = "v2i.config.json";

pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_DURATION_SECS: u32 = 15;
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 760;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

pub const OUTPUT_DIR_PREFIX: &str = "output_frames";
pub const FRAME_FILE_PREFIX: &str = "home_";
pub const FRAME_FILE_EXTENSION: &str = "jpg";

/// Built-in message table, overridable through `messages_file` in the config.
pub const DEFAULT_MESSAGES: &str = include_str!("../../assets/texts.json");
