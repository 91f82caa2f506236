use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::color::{ColorFrame, Hsv};

/// Upper HSV limits of the skin gate (hue on the 0..180 scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinRange {
    pub hue_max: u8,
    pub saturation_max: u8,
    pub value_max: u8,
}

impl Default for SkinRange {
    fn default() -> Self {
        Self {
            hue_max: 18,
            saturation_max: 50,
            value_max: 80,
        }
    }
}

impl SkinRange {
    /// True when every channel sits at or under its limit
    pub fn contains(&self, hsv: Hsv) -> bool {
        hsv.h <= self.hue_max && hsv.s <= self.saturation_max && hsv.v <= self.value_max
    }
}

/// Build the skin mask of a frame.
///
/// Each HSV plane is inverse-thresholded at its limit, the three planes are
/// AND-ed and the result is inverted: pixels inside the HSV box come out 0,
/// everything else 255. Subtracting this mask from a binary image keeps only
/// the pixels inside the box.
pub fn skin_mask(frame: &ColorFrame<'_>, range: &SkinRange) -> GrayImage {
    GrayImage::from_fn(frame.width() as u32, frame.height() as u32, |x, y| {
        let hsv = frame.pixel(x as usize, y as usize).to_hsv();
        let h = if hsv.h > range.hue_max { 0 } else { 255u8 };
        let s = if hsv.s > range.saturation_max { 0 } else { 255u8 };
        let v = if hsv.v > range.value_max { 0 } else { 255u8 };
        Luma([!(h & s & v)])
    })
}
