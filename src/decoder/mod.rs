pub mod frame_data;
pub mod source;
pub mod video;

pub use frame_data::Frame;
pub use source::FrameSource;
pub use video::OpenCvSource;
