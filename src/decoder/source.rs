use anyhow::Result;

use super::frame_data::Frame;

/// Random-access video input: metadata plus one seek-and-decode per call.
pub trait FrameSource {
    /// Native frames per second as reported by the container.
    fn frame_rate(&self) -> f64;

    /// Total frame count as reported by the container.
    fn frame_count(&self) -> f64;

    /// Seeks to `index` and decodes one frame. `Ok(None)` marks the end of the stream.
    fn read_at(&mut self, index: u64) -> Result<Option<Frame>>;
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// In-memory source whose frames encode their own index in the first byte.
    pub struct SyntheticSource {
        pub fps: f64,
        pub reported_frames: f64,
        pub decodable_frames: u64,
        pub width: u32,
        pub height: u32,
        pub requested: Vec<u64>,
        pub fail_from: Option<u64>,
    }

    impl SyntheticSource {
        pub fn new(fps: f64, frames: u64) -> Self {
            Self {
                fps,
                reported_frames: frames as f64,
                decodable_frames: frames,
                width: 8,
                height: 6,
                requested: Vec::new(),
                fail_from: None,
            }
        }

        /// Container claims `reported` frames but only `decodable` can be read.
        pub fn truncated(fps: f64, reported: u64, decodable: u64) -> Self {
            Self { reported_frames: reported as f64, decodable_frames: decodable, ..Self::new(fps, decodable) }
        }

        /// Reads at or past `index` return a decode error.
        pub fn failing_from(mut self, index: u64) -> Self {
            self.fail_from = Some(index);
            self
        }

        pub fn with_size(mut self, width: u32, height: u32) -> Self {
            self.width = width;
            self.height = height;
            self
        }
    }

    impl FrameSource for SyntheticSource {
        fn frame_rate(&self) -> f64 {
            self.fps
        }

        fn frame_count(&self) -> f64 {
            self.reported_frames
        }

        fn read_at(&mut self, index: u64) -> Result<Option<Frame>> {
            self.requested.push(index);
            if self.fail_from.is_some_and(|from| index >= from) {
                anyhow::bail!("corrupt packet at frame {}", index);
            }
            if index >= self.decodable_frames {
                return Ok(None);
            }
            let mut frame = Frame::filled(self.width, self.height, [0, 0, 0]);
            frame.buffer[0] = (index % 256) as u8;
            Ok(Some(frame))
        }
    }
}
