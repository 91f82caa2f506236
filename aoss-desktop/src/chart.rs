use anyhow::Result;
use aoss_shared::TrackedPair;
use opencv::{
    core::{Mat, Point, Scalar, CV_8UC3},
    imgproc,
    prelude::*,
};

pub const CHART_WIDTH: i32 = 400;
const BAR_WIDTH: i32 = 40;

const WHITE: [f64; 3] = [255.0, 255.0, 255.0];
const RED: [f64; 3] = [0.0, 0.0, 255.0];
const PEACH: [f64; 3] = [185.0, 218.0, 255.0];
const BISQUE: [f64; 3] = [158.0, 183.0, 205.0];
const STEEL: [f64; 3] = [180.0, 130.0, 70.0];
const CADET: [f64; 3] = [160.0, 158.0, 95.0];
const ORANGE: [f64; 3] = [0.0, 69.0, 255.0];
const DARK_ORANGE: [f64; 3] = [0.0, 140.0, 255.0];

fn bgr(c: [f64; 3]) -> Scalar {
    Scalar::new(c[0], c[1], c[2], 0.0)
}

/// Left edge and label of each bar
const BARS: [(i32, &str); 6] = [
    (5, "x1"),
    (55, "y1"),
    (155, "x2"),
    (205, "y2"),
    (305, "dx"),
    (355, "dy"),
];

/// Bar chart of the left center, the right center and their per-axis distance.
///
/// The axis sits at the larger frame dimension so any coordinate fits
/// above it.
pub fn draw_bar_chart(frame_width: i32, frame_height: i32, pair: Option<&TrackedPair>) -> Result<Mat> {
    let axis = frame_width.max(frame_height);
    let mut chart =
        Mat::new_rows_cols_with_default(axis + 50, CHART_WIDTH, CV_8UC3, Scalar::all(0.0))?;

    imgproc::line(
        &mut chart,
        Point::new(0, axis),
        Point::new(CHART_WIDTH, axis),
        bgr(RED),
        5,
        imgproc::LINE_8,
        0,
    )?;

    for (x, label) in BARS {
        imgproc::put_text(
            &mut chart,
            label,
            Point::new(x, axis + 30),
            imgproc::FONT_HERSHEY_TRIPLEX,
            1.0,
            bgr(WHITE),
            1,
            imgproc::LINE_8,
            false,
        )?;
    }

    let Some(pair) = pair else {
        return Ok(chart);
    };

    let ((x1, y1), (x2, y2)) = pair.left_right();
    let (dx, dy) = pair.axis_distance();
    let values = [x1, y1, x2, y2, dx as i32, dy as i32];
    let colors = [PEACH, BISQUE, STEEL, CADET, ORANGE, DARK_ORANGE];

    for (((x, _), value), color) in BARS.iter().zip(values).zip(colors) {
        imgproc::rectangle_points(
            &mut chart,
            Point::new(*x, axis),
            Point::new(x + BAR_WIDTH, axis - value),
            bgr(color),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )?;
    }

    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoss_shared::Position;
    use opencv::core::Vec3b;

    fn pixel(chart: &Mat, x: i32, y: i32) -> [u8; 3] {
        let px = chart.at_2d::<Vec3b>(y, x).unwrap();
        [px[0], px[1], px[2]]
    }

    #[test]
    fn test_chart_size_follows_larger_dimension() {
        let chart = draw_bar_chart(640, 480, None).unwrap();
        assert_eq!(chart.cols(), CHART_WIDTH);
        assert_eq!(chart.rows(), 690);

        let tall = draw_bar_chart(240, 320, None).unwrap();
        assert_eq!(tall.rows(), 370);
    }

    #[test]
    fn test_axis_is_red() {
        let chart = draw_bar_chart(100, 100, None).unwrap();
        assert_eq!(pixel(&chart, 200, 100), [0, 0, 255]);
    }

    #[test]
    fn test_bar_heights() {
        let pair = TrackedPair::new(Position::new(90.0, 10.0), Position::new(30.0, 60.0));
        let chart = draw_bar_chart(200, 100, Some(&pair)).unwrap();
        let axis = 200;

        // Left center is (30, 60): its x bar reaches 30 px up, no further
        assert_eq!(pixel(&chart, 25, axis - 25), [185, 218, 255]);
        assert_eq!(pixel(&chart, 25, axis - 40), [0, 0, 0]);
        // dy = 50
        assert_eq!(pixel(&chart, 375, axis - 45), [0, 140, 255]);
        assert_eq!(pixel(&chart, 375, axis - 60), [0, 0, 0]);
    }
}
