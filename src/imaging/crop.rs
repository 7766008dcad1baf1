use anyhow::Result;
use fast_image_resize as fr;
use fr::images::Image;

use crate::core::config::Resolution;
use crate::decoder::frame_data::{Frame, CHANNELS};

/// Sub-rectangle of the input kept before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered region of `input_w x input_h` with the target's aspect ratio.
///
/// Wider inputs lose columns on both sides, taller ones lose rows. Equal aspect
/// ratios take the row branch, which keeps the whole frame. Ratios are compared
/// by cross-multiplication so that equal ratios stay equal.
pub fn crop_region(input_w: u32, input_h: u32, target: Resolution) -> CropRegion {
    let (iw, ih) = (input_w as u64, input_h as u64);
    let (tw, th) = (target.width as u64, target.height as u64);

    if iw * th > tw * ih {
        let new_w = ((ih * tw / th) as u32).clamp(1, input_w);
        CropRegion {
            x: (input_w - new_w) / 2,
            y: 0,
            width: new_w,
            height: input_h,
        }
    } else {
        let new_h = ((iw * th / tw) as u32).clamp(1, input_h);
        CropRegion {
            x: 0,
            y: (input_h - new_h) / 2,
            width: input_w,
            height: new_h,
        }
    }
}

fn copy_region(frame: &Frame, region: CropRegion) -> Vec<u8> {
    let row_len = region.width as usize * CHANNELS;
    let mut out = Vec::with_capacity(row_len * region.height as usize);
    for y in region.y..region.y + region.height {
        let start = y as usize * frame.row_stride() + region.x as usize * CHANNELS;
        out.extend_from_slice(&frame.buffer[start..start + row_len]);
    }
    out
}

/// Center-crops `frame` to the target aspect ratio, then scales it to exactly `target`.
pub fn crop_and_resize(frame: &Frame, target: Resolution) -> Result<Frame> {
    let region = crop_region(frame.width, frame.height, target);
    let cropped = if region.width == frame.width && region.height == frame.height {
        frame.buffer.clone()
    } else {
        copy_region(frame, region)
    };

    if region.width == target.width && region.height == target.height {
        return Ok(Frame::new(cropped, target.width, target.height));
    }

    let src_image = Image::from_vec_u8(region.width, region.height, cropped, fr::PixelType::U8x3)?;
    let mut dst_image = Image::new(target.width, target.height, fr::PixelType::U8x3);

    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Bilinear));
    let mut resizer = fr::Resizer::new();
    resizer.resize(&src_image, &mut dst_image, &options)?;

    Ok(Frame::new(dst_image.buffer().to_vec(), target.width, target.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wider_input_crops_columns() {
        let region = crop_region(2000, 760, Resolution::new(1280, 760));
        assert_eq!(region, CropRegion { x: 360, y: 0, width: 1280, height: 760 });
    }

    #[test]
    fn test_taller_input_crops_rows() {
        let region = crop_region(1000, 1000, Resolution::new(1280, 760));
        assert_eq!(region.width, 1000);
        assert_eq!(region.height, 593);
        assert_eq!(region.x, 0);
        assert_eq!(region.y, (1000 - 593) / 2);
    }

    #[test]
    fn test_equal_aspect_keeps_whole_frame() {
        let region = crop_region(640, 380, Resolution::new(1280, 760));
        assert_eq!(region, CropRegion { x: 0, y: 0, width: 640, height: 380 });
    }

    #[test]
    fn test_degenerate_input_keeps_one_pixel() {
        let region = crop_region(1, 1000, Resolution::new(1000, 1));
        assert_eq!(region.height, 1);
        assert_eq!(region.width, 1);
    }

    #[test]
    fn test_identity_resize_returns_same_pixels() {
        let mut frame = Frame::filled(16, 9, [1, 2, 3]);
        frame.buffer[5] = 99;
        let out = crop_and_resize(&frame, Resolution::new(16, 9)).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_output_dimensions_are_exact() {
        let target = Resolution::new(64, 38);
        for (w, h) in [(200, 76), (76, 200), (64, 38), (33, 33), (1, 7)] {
            let frame = Frame::filled(w, h, [40, 80, 120]);
            let out = crop_and_resize(&frame, target).unwrap();
            assert_eq!((out.width, out.height), (64, 38), "input {}x{}", w, h);
            assert_eq!(out.buffer.len(), 64 * 38 * 3);
        }
    }

    #[test]
    fn test_crop_discards_side_margins() {
        // Left and right quarters are red, centre is blue; a square target keeps only blue.
        let (w, h) = (8u32, 4u32);
        let mut frame = Frame::filled(w, h, [255, 0, 0]);
        for y in 0..h {
            for x in 2..6 {
                let offset = y as usize * frame.row_stride() + x as usize * 3;
                frame.buffer[offset..offset + 3].copy_from_slice(&[0, 0, 255]);
            }
        }
        let out = crop_and_resize(&frame, Resolution::new(4, 4)).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), [0, 0, 255]);
            }
        }
    }

    #[test]
    fn test_uniform_frame_stays_uniform_after_scaling() {
        let frame = Frame::filled(300, 100, [10, 20, 30]);
        let out = crop_and_resize(&frame, Resolution::new(50, 25)).unwrap();
        for px in out.buffer.chunks(3) {
            for (got, want) in px.iter().zip([10u8, 20, 30]) {
                assert!(got.abs_diff(want) <= 1, "pixel {:?}", px);
            }
        }
    }
}
