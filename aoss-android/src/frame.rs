use aoss_shared::TrackedPair;
use aoss_vision::{gray, BlobTracker, ColorFrame, PixelLayout, TrackerConfig};
use image::{ImageBuffer, Rgba};
use imageproc::drawing::draw_filled_circle_mut;

use crate::error::{BridgeError, Result};

pub const MARKER_RADIUS: i32 = 5;
pub const MARKER_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Distance reported to the view when no pair was found
pub const NO_PAIR: f64 = -1.0;

/// Preview frames are small, so every contour with a positive area counts
pub fn preview_tracker() -> BlobTracker {
    BlobTracker::new(TrackerConfig::default().with_min_area(1.0))
}

pub fn frame_size(width: i32, height: i32) -> Result<(usize, usize)> {
    if width <= 0 || height <= 0 {
        return Err(BridgeError::InvalidSize { width, height });
    }
    Ok((width as usize, height as usize))
}

/// Track one preview frame and mark both centroids into `rgba`.
///
/// `yuv` is the NV21 camera buffer; only its luma plane is read.
pub fn track_preview(
    tracker: &BlobTracker,
    yuv: &[u8],
    rgba: &mut [u8],
    width: usize,
    height: usize,
) -> Result<Option<TrackedPair>> {
    let luma = gray::luma_plane(width, height, yuv)?;
    let pair = {
        let color = ColorFrame::new(width, height, PixelLayout::Rgba, rgba)?;
        tracker.analyze(&luma, &color)?.tracked_pair()
    };

    if let Some(pair) = pair {
        let mut canvas: ImageBuffer<Rgba<u8>, &mut [u8]> =
            ImageBuffer::from_raw(width as u32, height as u32, rgba).ok_or(
                BridgeError::InvalidSize {
                    width: width as i32,
                    height: height as i32,
                },
            )?;
        for center in [pair.first, pair.second] {
            draw_filled_circle_mut(&mut canvas, center.to_pixel(), MARKER_RADIUS, MARKER_COLOR);
        }
    }
    Ok(pair)
}

pub fn reported_distance(pair: Option<&TrackedPair>) -> f64 {
    pair.map_or(NO_PAIR, |p| p.distance())
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 64;
    const H: usize = 48;

    /// White RGBA preview with a matching NV21 buffer
    fn preview(squares: &[(usize, usize, usize)]) -> (Vec<u8>, Vec<u8>) {
        let mut rgba = vec![255u8; W * H * 4];
        let mut yuv = vec![255u8; W * H];
        yuv.extend(std::iter::repeat(128).take(W * H / 2));

        for &(x0, y0, size) in squares {
            for y in y0..y0 + size {
                for x in x0..x0 + size {
                    let i = (y * W + x) * 4;
                    rgba[i..i + 3].copy_from_slice(&[0, 0, 0]);
                    yuv[y * W + x] = 0;
                }
            }
        }
        (yuv, rgba)
    }

    fn rgb_at(rgba: &[u8], x: usize, y: usize) -> [u8; 3] {
        let i = (y * W + x) * 4;
        [rgba[i], rgba[i + 1], rgba[i + 2]]
    }

    #[test]
    fn test_pair_is_marked_green() {
        let (yuv, mut rgba) = preview(&[(5, 5, 20), (40, 10, 12)]);
        let pair = track_preview(&preview_tracker(), &yuv, &mut rgba, W, H)
            .unwrap()
            .unwrap();

        // Squares shrink to 6..=23 and 41..=50 after the blur
        assert_eq!(pair.pixel_centers(), ((14, 14), (45, 15)));
        assert_eq!(rgb_at(&rgba, 14, 14), [0, 255, 0]);
        assert_eq!(rgb_at(&rgba, 45, 15), [0, 255, 0]);
        assert_eq!(rgb_at(&rgba, 14, 20), [0, 0, 0]);
        assert_eq!(rgb_at(&rgba, 60, 40), [255, 255, 255]);
        // markers are opaque
        assert_eq!(rgba[(14 * W + 14) * 4 + 3], 255);

        let distance = reported_distance(Some(&pair));
        assert!((distance - (31.0f64 * 31.0 + 1.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_no_pair_leaves_frame_alone() {
        let (yuv, mut rgba) = preview(&[(5, 5, 20)]);
        let before = rgba.clone();
        let pair = track_preview(&preview_tracker(), &yuv, &mut rgba, W, H).unwrap();

        assert!(pair.is_none());
        assert_eq!(rgba, before);
        assert_eq!(reported_distance(pair.as_ref()), NO_PAIR);
    }

    #[test]
    fn test_short_buffers_are_rejected() {
        let (yuv, mut rgba) = preview(&[]);
        let tracker = preview_tracker();

        let err = track_preview(&tracker, &yuv[..10], &mut rgba, W, H).unwrap_err();
        assert!(matches!(err, BridgeError::Vision(_)));
        assert_eq!(err.java_class(), "java/lang/IllegalArgumentException");

        let err = track_preview(&tracker, &yuv, &mut rgba[..W * 4], W, H).unwrap_err();
        assert!(matches!(err, BridgeError::Vision(_)));
    }

    #[test]
    fn test_huge_sizes_are_rejected() {
        let (yuv, mut rgba) = preview(&[]);
        let err = track_preview(&preview_tracker(), &yuv, &mut rgba, usize::MAX / 2, 3)
            .unwrap_err();
        assert!(matches!(err, BridgeError::Vision(_)));

        let side = i32::MAX as usize;
        assert!(track_preview(&preview_tracker(), &yuv, &mut rgba, side, side).is_err());
    }

    #[test]
    fn test_frame_size_must_be_positive() {
        assert_eq!(frame_size(640, 480).unwrap(), (640, 480));
        assert!(matches!(
            frame_size(0, 480),
            Err(BridgeError::InvalidSize { .. })
        ));
        assert!(frame_size(640, -1).is_err());
    }
}
