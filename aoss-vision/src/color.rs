use crate::error::{Result, VisionError};

/// BGR color value, the channel order OpenCV frames arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bgr {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

/// 8-bit HSV value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8, // 0-179
    pub s: u8, // 0-255
    pub v: u8, // 0-255
}

impl Bgr {
    pub fn new(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    /// BT.601 luma in 14-bit fixed point
    pub fn to_gray(&self) -> u8 {
        let (b, g, r) = (self.b as u32, self.g as u32, self.r as u32);
        ((r * 4899 + g * 9617 + b * 1868 + (1 << 13)) >> 14) as u8
    }

    /// Convert to HSV with hue halved onto 0..180 so it fits a byte
    pub fn to_hsv(&self) -> Hsv {
        let (b, g, r) = (self.b as i32, self.g as i32, self.r as i32);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max == 0 {
            0
        } else {
            (255.0 * delta as f32 / max as f32).round() as u8
        };

        let h = if delta == 0 {
            0.0
        } else if max == r {
            60.0 * (g - b) as f32 / delta as f32
        } else if max == g {
            120.0 + 60.0 * (b - r) as f32 / delta as f32
        } else {
            240.0 + 60.0 * (r - g) as f32 / delta as f32
        };
        let h = if h < 0.0 { h + 360.0 } else { h };
        let h = (h / 2.0).round() as u32 % 180;

        Hsv {
            h: h as u8,
            s,
            v: max as u8,
        }
    }
}

/// Channel order of an interleaved color buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Bgr,
    Rgb,
    Bgra,
    Rgba,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Bgr | PixelLayout::Rgb => 3,
            PixelLayout::Bgra | PixelLayout::Rgba => 4,
        }
    }

    /// Read the pixel starting at `px[0]`
    fn decode(self, px: &[u8]) -> Bgr {
        match self {
            PixelLayout::Bgr | PixelLayout::Bgra => Bgr::new(px[0], px[1], px[2]),
            PixelLayout::Rgb | PixelLayout::Rgba => Bgr::new(px[2], px[1], px[0]),
        }
    }
}

/// Borrowed interleaved color frame
#[derive(Debug, Clone, Copy)]
pub struct ColorFrame<'a> {
    width: usize,
    height: usize,
    layout: PixelLayout,
    data: &'a [u8],
}

impl<'a> ColorFrame<'a> {
    pub fn new(width: usize, height: usize, layout: PixelLayout, data: &'a [u8]) -> Result<Self> {
        check_buffer(width, height, layout, data.len())?;
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn pixel(&self, x: usize, y: usize) -> Bgr {
        let idx = (y * self.width + x) * self.layout.channels();
        self.layout.decode(&self.data[idx..])
    }

    /// Iterate pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Bgr> + '_ {
        let channels = self.layout.channels();
        self.data[..self.width * self.height * channels]
            .chunks_exact(channels)
            .map(move |px| self.layout.decode(px))
    }
}

/// Bytes needed for a `width` x `height` frame. Sizes must be non-zero and
/// fit the `u32` dimensions images are indexed with.
pub(crate) fn frame_len(width: usize, height: usize, channels: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyFrame { width, height });
    }
    if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
        return Err(VisionError::TooLarge { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(VisionError::TooLarge { width, height })
}

fn check_buffer(width: usize, height: usize, layout: PixelLayout, len: usize) -> Result<()> {
    let expected = frame_len(width, height, layout.channels())?;
    if len < expected {
        return Err(VisionError::BufferTooSmall {
            expected,
            actual: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colors_to_hsv() {
        let red = Bgr::new(0, 0, 255).to_hsv();
        assert_eq!(red, Hsv { h: 0, s: 255, v: 255 });

        let green = Bgr::new(0, 255, 0).to_hsv();
        assert_eq!(green.h, 60);

        let blue = Bgr::new(255, 0, 0).to_hsv();
        assert_eq!(blue.h, 120);
    }

    #[test]
    fn test_gray_has_no_hue_or_saturation() {
        let gray = Bgr::new(128, 128, 128).to_hsv();
        assert_eq!(gray, Hsv { h: 0, s: 0, v: 128 });
    }

    #[test]
    fn test_hue_wraps_below_red() {
        // 359.8 degrees rounds to 180, which wraps to 0
        assert_eq!(Bgr::new(1, 0, 255).to_hsv().h, 0);
        // 352 degrees stays just under the wrap
        assert_eq!(Bgr::new(34, 0, 255).to_hsv().h, 176);
    }

    #[test]
    fn test_luma() {
        assert_eq!(Bgr::new(255, 255, 255).to_gray(), 255);
        assert_eq!(Bgr::new(0, 0, 0).to_gray(), 0);
        // Pure red weighs ~0.299
        assert_eq!(Bgr::new(0, 0, 255).to_gray(), 76);
    }

    #[test]
    fn test_frame_layouts_agree() {
        let bgr = [10u8, 20, 30];
        let rgba = [30u8, 20, 10, 255];
        let a = ColorFrame::new(1, 1, PixelLayout::Bgr, &bgr).unwrap();
        let b = ColorFrame::new(1, 1, PixelLayout::Rgba, &rgba).unwrap();
        assert_eq!(a.pixel(0, 0), b.pixel(0, 0));
        assert_eq!(a.pixel(0, 0), Bgr::new(10, 20, 30));
    }

    #[test]
    fn test_frame_rejects_short_buffer() {
        let data = [0u8; 11];
        let err = ColorFrame::new(2, 2, PixelLayout::Bgr, &data).unwrap_err();
        assert_eq!(
            err,
            VisionError::BufferTooSmall {
                expected: 12,
                actual: 11
            }
        );
        assert!(matches!(
            ColorFrame::new(0, 2, PixelLayout::Bgr, &data),
            Err(VisionError::EmptyFrame { .. })
        ));
    }

    #[test]
    fn test_huge_frame_is_an_error() {
        assert!(matches!(
            ColorFrame::new(usize::MAX / 2, 3, PixelLayout::Rgba, &[]),
            Err(VisionError::TooLarge { .. })
        ));
        // Each side fits u32 but the byte count overflows usize
        let side = u32::MAX as usize;
        assert!(ColorFrame::new(side, side, PixelLayout::Rgba, &[]).is_err());
    }
}
