use aoss_shared::Position;

use crate::contour::Point;

/// Spatial moments of a closed polygon up to second order
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
}

impl Moments {
    /// Green's theorem over the polygon edges. The sign is normalized so
    /// `m00` is the enclosed area whatever the winding.
    pub fn of_polygon(points: &[Point]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let (mut a00, mut a10, mut a01) = (0.0, 0.0, 0.0);
        let (mut a20, mut a11, mut a02) = (0.0, 0.0, 0.0);

        let mut prev = points[points.len() - 1];
        for &cur in points {
            let (x0, y0) = (prev.x as f64, prev.y as f64);
            let (x1, y1) = (cur.x as f64, cur.y as f64);

            let dxy = x0 * y1 - x1 * y0;
            let xs = x0 + x1;
            let ys = y0 + y1;

            a00 += dxy;
            a10 += dxy * xs;
            a01 += dxy * ys;
            a20 += dxy * (x0 * xs + x1 * x1);
            a11 += dxy * (x0 * (ys + y0) + x1 * (ys + y1));
            a02 += dxy * (y0 * ys + y1 * y1);

            prev = cur;
        }

        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Self {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
            m20: sign * a20 / 12.0,
            m11: sign * a11 / 24.0,
            m02: sign * a02 / 12.0,
        }
    }

    /// Mass center, `None` for a degenerate polygon
    pub fn centroid(&self) -> Option<Position> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Position::new(
            (self.m10 / self.m00) as f32,
            (self.m01 / self.m00) as f32,
        ))
    }
}
