//! Border extraction on binary masks.
//!
//! Border following is done by `imageproc`. The mask is framed with one row
//! and column of background on every side first, so components touching the
//! image edge keep an outer border.

use image::GrayImage;
use imageproc::contours::BorderType;

/// Integer pixel coordinate
pub type Point = imageproc::point::Point<i32>;

/// Axis-aligned box, `width`/`height` count pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive bottom-right corner
    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

impl From<BorderType> for BorderKind {
    fn from(border: BorderType) -> Self {
        match border {
            BorderType::Outer => BorderKind::Outer,
            BorderType::Hole => BorderKind::Hole,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub kind: BorderKind,
    pub points: Vec<Point>,
}

/// Every border of the non-zero regions of `mask`, outer and hole alike,
/// in raster order of their first pixel
pub fn find_contours(mask: &GrayImage) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let mut framed = GrayImage::new(width + 2, height + 2);
    image::imageops::replace(&mut framed, mask, 1, 1);

    imageproc::contours::find_contours::<i32>(&framed)
        .into_iter()
        .map(|contour| Contour {
            kind: contour.border_type.into(),
            points: contour
                .points
                .into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect(),
        })
        .collect()
}

/// Inclusive extent of `points`, so a single pixel is 1x1
pub fn bounding_rect(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    }
}
