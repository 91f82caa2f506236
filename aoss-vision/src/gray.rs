use image::{GrayImage, Luma};

use crate::color::{frame_len, ColorFrame};
use crate::error::{Result, VisionError};

/// Copy the first `width * height` bytes of `plane`, e.g. the luma plane of
/// an NV21 frame
pub fn luma_plane(width: usize, height: usize, plane: &[u8]) -> Result<GrayImage> {
    let len = frame_len(width, height, 1)?;
    if plane.len() < len {
        return Err(VisionError::BufferTooSmall {
            expected: len,
            actual: plane.len(),
        });
    }
    GrayImage::from_raw(width as u32, height as u32, plane[..len].to_vec()).ok_or(
        VisionError::BufferTooSmall {
            expected: len,
            actual: plane.len(),
        },
    )
}

/// Luma of every pixel of a color frame
pub fn from_color(frame: &ColorFrame<'_>) -> GrayImage {
    let data: Vec<u8> = frame.pixels().map(|px| px.to_gray()).collect();
    let (width, height) = (frame.width() as u32, frame.height() as u32);
    GrayImage::from_raw(width, height, data)
        .unwrap_or_else(|| GrayImage::from_pixel(width, height, Luma([0])))
}
