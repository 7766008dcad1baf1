/// Decoded raster: packed BGR, 3 bytes per pixel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub const CHANNELS: usize = 3;

impl Frame {
    pub fn new(buffer: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(buffer.len(), width as usize * height as usize * CHANNELS);
        Self { buffer, width, height }
    }

    #[cfg(test)]
    pub fn filled(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let buffer = bgr
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self { buffer, width, height }
    }

    pub fn row_stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = y as usize * self.row_stride() + x as usize * CHANNELS;
        [self.buffer[offset], self.buffer[offset + 1], self.buffer[offset + 2]]
    }
}
